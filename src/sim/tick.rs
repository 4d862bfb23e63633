//! Fixed timestep simulation tick
//!
//! `tick` advances the world by one logical step in a fixed system order.
//! `FrameDriver` converts variable frame times into whole ticks.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::{combat, director, enemy, particles, player};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash (held; fires whenever the cooldown allows)
    pub dash: bool,
    /// Fire (held; rate limited by the fire cooldown)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Summon a wave around the player (one-shot)
    pub spawn_wave: bool,
    /// Pact selection 0..=2 (one-shot)
    pub pact_choice: Option<usize>,
}

impl TickInput {
    /// Unnormalized movement direction from the held keys
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn has_one_shots(&self) -> bool {
        self.pause || self.spawn_wave || self.pact_choice.is_some()
    }

    /// Drop one-shot events, keeping held state
    pub fn clear_one_shots(&mut self) {
        self.pause = false;
        self.spawn_wave = false;
        self.pact_choice = None;
    }

    /// Fold another input's one-shot events into this one
    pub fn merge_one_shots(&mut self, other: &TickInput) {
        self.pause ^= other.pause;
        self.spawn_wave |= other.spawn_wave;
        if other.pact_choice.is_some() {
            self.pact_choice = other.pact_choice;
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Pact selection is the one input honored while gameplay is frozen
    if let Some(index) = input.pact_choice {
        director::choose_pact(state, index);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    if input.spawn_wave {
        enemy::spawn_enemy_wave(state, MANUAL_WAVE_SIZE);
    }

    let here = state.player_world_pos();
    state.obstacles.ensure_around(here);

    player::update_player(state, input);
    if state.phase == GamePhase::GameOver {
        return;
    }

    combat::update_projectiles(state);
    enemy::update_rifts(state);
    enemy::update_enemies(state);
    particles::update_particles(&mut state.particles);
    combat::resolve_player_hits(state);
    enemy::update_enemy_projectiles(state);
    combat::resolve_enemy_hits(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    director::update(state);
}

/// Turns wall-clock frame deltas into fixed ticks
///
/// One-shot events are delivered on the first tick that actually runs, even
/// if several short frames pass before the accumulator fills.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
    pending: TickInput,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `frame_dt` seconds cover; returns the count
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        if input.has_one_shots() {
            self.pending.merge_one_shots(input);
        }
        if !frame_dt.is_finite() {
            log::debug!("Ignoring non-finite frame delta {}", frame_dt);
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut step = input.clone();
            step.clear_one_shots();
            step.merge_one_shots(&self.pending);
            self.pending.clear_one_shots();

            tick(state, &step);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS {
            // Too far behind: drop the backlog instead of spiraling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        substeps
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::enemy::spawn_enemy;
    use crate::sim::obstacles::ObstacleGrid;
    use crate::sim::state::{EnemyKind, EnemyProjectile, ShotKind, Viewport};
    use proptest::prelude::*;

    fn open_arena() -> GameState {
        let mut state = GameState::with_config(
            21,
            Tuning::default(),
            Viewport::default(),
            ObstacleGrid::fixed(21),
        );
        state.rift_timer = u32::MAX;
        state
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = open_arena();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        let moving = TickInput {
            right: true,
            ..Default::default()
        };
        let pos = state.player_world_pos();
        tick(&mut state, &moving);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player_world_pos(), pos);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_kill_scenario() {
        let mut state = open_arena();
        let above = state.player_world_pos() + Vec2::new(0.0, -200.0);
        let id = spawn_enemy(&mut state, EnemyKind::Grunt, above);
        assert_eq!(state.enemies[0].hp, 30.0);

        // Exactly two shots: tick 1 and tick 1 + fire cooldown
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..=state.tuning.fire_cooldown_ticks {
            tick(&mut state, &fire);
        }
        assert_eq!(state.player.fire_cooldown, state.tuning.fire_cooldown_ticks);

        let mut first_hit_seen = false;
        for _ in 0..120 {
            let aura_before = state.player.aura;
            tick(&mut state, &TickInput::default());
            if let Some(e) = state.enemies.iter().find(|e| e.id == id) {
                if e.hp < 30.0 {
                    assert_eq!(e.hp, 10.0);
                    first_hit_seen = true;
                }
                continue;
            }
            assert!(first_hit_seen);
            assert_eq!(state.kills, 1);
            assert_eq!(state.score, 100);
            let expected = (aura_before + state.tuning.aura_regen + 5.0).min(AURA_MAX);
            assert!((state.player.aura - expected).abs() < 1e-3);
            return;
        }
        panic!("enemy was never killed");
    }

    #[test]
    fn test_quota_level_up_scenario() {
        let mut state = open_arena();
        assert_eq!(state.tuning.enemies_per_level, 20);
        state.kills_this_level = 19;
        state.player.aura = 40.0;

        let muzzle = Vec2::new(state.viewport.center().x, state.viewport.height - MUZZLE_OFFSET_Y);
        let world = crate::screen_to_world(muzzle + Vec2::new(0.0, -40.0), state.player.camera);
        spawn_enemy(&mut state, EnemyKind::Swarmer, world);
        state.enemies[0].hp = 1.0;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &fire);
            if state.level == 2 {
                break;
            }
        }
        assert_eq!(state.level, 2);
        assert_eq!(state.kills_this_level, 0);
        assert_eq!(state.player.aura, AURA_MAX);
        assert_eq!(state.phase, GamePhase::ChoosingPact);
        assert_eq!(state.pact_choice.as_ref().map(|c| c.offered.len()), Some(3));

        // Frozen until a pact is picked
        let frozen_ticks = state.time_ticks;
        tick(&mut state, &fire);
        assert_eq!(state.time_ticks, frozen_ticks);

        let choose = TickInput {
            pact_choice: Some(0),
            ..Default::default()
        };
        tick(&mut state, &choose);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, frozen_ticks + 1);
    }

    #[test]
    fn test_idle_damage_scenario() {
        let mut state = open_arena();
        let threshold = state.tuning.idle_threshold_ticks;
        for _ in 0..threshold {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.health, state.player.max_health);

        let mut last = state.player.health;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
            assert!(state.player.health < last);
            last = state.player.health;
        }
        assert!(player::is_idle_penalized(&state));

        // Moving again stops the drain
        let moving = TickInput {
            up: true,
            ..Default::default()
        };
        tick(&mut state, &moving);
        let after_move = state.player.health;
        tick(&mut state, &moving);
        assert_eq!(state.player.health, after_move);
        assert!(!player::is_idle_penalized(&state));
    }

    #[test]
    fn test_idle_drain_ends_game() {
        let mut state = open_arena();
        state.player.health = 0.1;
        state.player.idle_ticks = state.tuning.idle_threshold_ticks;
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput { right: true, ..Default::default() });
        assert_eq!(state.time_ticks, ticks);
    }

    fn shot_on_player(state: &GameState) -> EnemyProjectile {
        EnemyProjectile {
            pos: state.viewport.center(),
            vel: Vec2::ZERO,
            radius: LINEAR_SHOT_RADIUS,
            damage: 10.0,
            kind: ShotKind::Linear,
        }
    }

    #[test]
    fn test_dash_invulnerability_scenario() {
        let mut state = open_arena();
        let dash = TickInput {
            right: true,
            dash: true,
            ..Default::default()
        };
        tick(&mut state, &dash);
        let full = state.player.health;

        let shot = shot_on_player(&state);
        state.enemy_projectiles.push(shot);
        for _ in 1..state.tuning.dash_invuln_ticks {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.player.health, full);
        }
        assert_eq!(state.enemy_projectiles.len(), 1);

        // Window over: the same shot now lands
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.health, full - 10.0);
        assert!(state.enemy_projectiles.is_empty());
    }

    #[test]
    fn test_manual_wave_input() {
        let mut state = open_arena();
        let input = TickInput {
            spawn_wave: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.enemies.len(), MANUAL_WAVE_SIZE as usize);
    }

    #[test]
    fn test_direction_from_keys() {
        let input = TickInput {
            up: true,
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_driver_runs_whole_ticks() {
        let mut state = open_arena();
        let mut driver = FrameDriver::new();
        let n = driver.advance(&mut state, &TickInput::default(), SIM_DT * 2.5);
        assert_eq!(n, 2);
        assert_eq!(state.time_ticks, 2);
        assert!((driver.alpha() - 0.5).abs() < 1e-3);

        let n = driver.advance(&mut state, &TickInput::default(), 5.0);
        assert!(n <= MAX_SUBSTEPS);
        assert!(n >= 5);
    }

    #[test]
    fn test_driver_survives_bad_frame_delta() {
        let mut state = open_arena();
        let mut driver = FrameDriver::new();
        let wave = TickInput {
            spawn_wave: true,
            ..Default::default()
        };
        assert_eq!(driver.advance(&mut state, &wave, f32::NAN), 0);
        assert_eq!(driver.advance(&mut state, &TickInput::default(), f32::INFINITY), 0);
        assert_eq!(state.time_ticks, 0);

        // Accumulator is untouched, and the held-back wave still arrives
        assert_eq!(driver.advance(&mut state, &TickInput::default(), SIM_DT * 2.5), 2);
        assert_eq!(state.time_ticks, 2);
        assert_eq!(state.enemies.len(), MANUAL_WAVE_SIZE as usize);
    }

    #[test]
    fn test_driver_holds_one_shots_until_a_tick_runs() {
        let mut state = open_arena();
        let mut driver = FrameDriver::new();
        let wave = TickInput {
            spawn_wave: true,
            ..Default::default()
        };

        assert_eq!(driver.advance(&mut state, &wave, SIM_DT * 0.5), 0);
        assert!(state.enemies.is_empty());

        assert_eq!(driver.advance(&mut state, &TickInput::default(), SIM_DT * 0.75), 1);
        assert_eq!(state.enemies.len(), MANUAL_WAVE_SIZE as usize);

        // Delivered once only
        driver.advance(&mut state, &TickInput::default(), SIM_DT * 2.5);
        assert_eq!(state.enemies.len(), MANUAL_WAVE_SIZE as usize);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let inputs = [
            TickInput { right: true, fire: true, ..Default::default() },
            TickInput { down: true, dash: true, ..Default::default() },
            TickInput { spawn_wave: true, ..Default::default() },
            TickInput { left: true, up: true, fire: true, ..Default::default() },
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player_world_pos(), b.player_world_pos());
        assert_eq!(a.player.health, b.player.health);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<[bool; 6]>(), prop::bool::weighted(0.02)).prop_map(|(k, wave)| TickInput {
            up: k[0],
            down: k[1],
            left: k[2],
            right: k[3],
            dash: k[4],
            fire: k[5],
            spawn_wave: wave,
            ..Default::default()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn vitals_stay_clamped(seed in any::<u64>(), inputs in prop::collection::vec(arb_input(), 1..200)) {
            let mut state = GameState::new(seed);
            state.player.max_health = 60.0;
            state.player.health = 60.0;
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!(state.player.health >= 0.0 && state.player.health <= state.player.max_health);
                prop_assert!(state.player.aura >= 0.0 && state.player.aura <= AURA_MAX);
            }
        }
    }
}
