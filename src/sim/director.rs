//! Progression: kill credit, level-ups and pact selection

use rand::seq::SliceRandom;

use super::particles::emit_burst;
use super::state::{GamePhase, GameState, Pact, PactChoice, ParticleColor};
use crate::consts::*;
use crate::rand_range;

/// Book a kill: score, aura refund and level progress
pub fn credit_kill(state: &mut GameState) {
    state.kills += 1;
    state.kills_this_level += 1;
    state.score += state.tuning.kill_score;
    state.player.aura += state.tuning.aura_per_kill;
    state.player.clamp_vitals();
}

/// End-of-tick progression check
pub fn update(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if state.kills_this_level >= state.tuning.enemies_per_level {
        level_up(state);
    }
}

/// Advance one level and, if enabled, freeze play until a pact is chosen
pub fn level_up(state: &mut GameState) {
    state.level += 1;
    state.kills_this_level = 0;
    state.player.aura = AURA_MAX;
    state.player.health += state.tuning.level_up_health_bonus;
    state.player.clamp_vitals();
    state.score += state.tuning.level_up_score;
    state.rift_spawn_count = state.tuning.rift_spawn_for_level(state.level);

    let vp = state.viewport;
    for _ in 0..24 {
        let at = glam::Vec2::new(
            rand_range(&mut state.rng, 100.0, vp.width - 100.0),
            rand_range(&mut state.rng, 100.0, vp.height - 100.0),
        );
        emit_burst(
            &mut state.particles,
            &mut state.rng,
            state.particle_cap,
            at,
            ParticleColor::LevelUp,
            4,
        );
    }

    log::info!("Level up! Now level {} (score {})", state.level, state.score);

    if state.tuning.pact_on_level_up {
        let offered = roll_pacts(state);
        log::info!(
            "Pacts offered: {}, {}, {}",
            offered[0].title(),
            offered[1].title(),
            offered[2].title()
        );
        state.pact_choice = Some(PactChoice { offered });
        state.phase = GamePhase::ChoosingPact;
    }
}

/// Three distinct pacts from the pool
fn roll_pacts(state: &mut GameState) -> [Pact; 3] {
    let mut pool = Pact::ALL;
    pool.shuffle(&mut state.rng);
    [pool[0], pool[1], pool[2]]
}

/// Apply the pact at `index` and resume play
///
/// Returns false (and changes nothing) when no choice is pending or the
/// index is out of range.
pub fn choose_pact(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::ChoosingPact {
        log::debug!("Pact choice {} ignored: no choice pending", index);
        return false;
    }
    let Some(pact) = state
        .pact_choice
        .as_ref()
        .and_then(|c| c.offered.get(index).copied())
    else {
        log::debug!("Pact choice {} ignored: out of range", index);
        return false;
    };

    pact.apply(&mut state.perks);
    state.pact_choice = None;
    state.phase = GamePhase::Playing;
    log::info!("Pact sealed: {}", pact.title());
    true
}
