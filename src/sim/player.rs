//! Player movement, dash, aura and firing
//!
//! Movement is resolved one axis at a time against every resident obstacle,
//! so pushing diagonally into a wall slides along it.

use glam::Vec2;

use super::obstacles::ObstacleGrid;
use super::particles::emit_burst;
use super::state::{GamePhase, GameState, ParticleColor, Projectile};
use super::tick::TickInput;
use crate::consts::*;

/// Move a circle by `delta`, applying each axis only if it stays clear of obstacles
pub fn slide_move(obstacles: &ObstacleGrid, pos: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let mut out = pos;

    if delta.x != 0.0 {
        let candidate = Vec2::new(out.x + delta.x, out.y);
        if !obstacles.blocks_circle(candidate, radius) {
            out = candidate;
        }
    }

    if delta.y != 0.0 {
        let candidate = Vec2::new(out.x, out.y + delta.y);
        if !obstacles.blocks_circle(candidate, radius) {
            out = candidate;
        }
    }

    out
}

/// Advance the player one tick: timers, movement, dash, aura, idle penalty, firing
pub fn update_player(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);
    player.dash_invuln = player.dash_invuln.saturating_sub(1);

    let center = state.viewport.center();
    let start_camera = player.camera;
    let dir = input.direction();

    if dir != Vec2::ZERO {
        let world = player.camera + center;
        let moved = slide_move(&state.obstacles, world, dir * tuning.player_speed, PLAYER_RADIUS);
        player.camera = moved - center;
    }

    let mut dashed = false;
    if input.dash && dir != Vec2::ZERO && player.dash_cooldown == 0 {
        let world = player.camera + center;
        let moved = slide_move(
            &state.obstacles,
            world,
            dir.normalize() * tuning.dash_distance,
            PLAYER_RADIUS,
        );
        player.camera = moved - center;
        player.dash_invuln = tuning.dash_invuln_ticks;
        player.dash_cooldown =
            (tuning.dash_cooldown_ticks as f32 * state.perks.dash_cooldown_mult).round() as u32;
        dashed = true;
    }

    if player.aura < AURA_MAX {
        player.aura += tuning.aura_regen * state.perks.aura_regen_mult;
    }
    player.clamp_vitals();

    let travelled = (player.camera - start_camera).abs();
    if travelled.x + travelled.y < IDLE_EPSILON {
        player.idle_ticks += 1;
    } else {
        player.idle_ticks = 0;
    }

    if player.idle_ticks > tuning.idle_threshold_ticks {
        player.health -= tuning.idle_health_drain;
        player.aura -= tuning.idle_aura_drain;
        player.clamp_vitals();
        if player.health <= 0.0 {
            log::info!("Player drained while idle - game over");
            state.phase = GamePhase::GameOver;
        }
    }

    if dashed {
        emit_burst(
            &mut state.particles,
            &mut state.rng,
            state.particle_cap,
            center,
            ParticleColor::Dash,
            12,
        );
    }

    if input.fire && state.phase == GamePhase::Playing {
        fire(state);
    }
}

/// Spawn a player shot if the cooldown is clear and there is aura to spend
pub fn fire(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.fire_cooldown > 0 || player.aura <= 0.0 {
        return false;
    }

    player.aura -= state.tuning.aura_per_shot;
    player.clamp_vitals();
    player.fire_cooldown = state.tuning.fire_cooldown_ticks;

    let pierce = if state.perks.piercing_shots {
        PIERCE_WITH_PACT
    } else {
        0
    };
    state.projectiles.push(Projectile {
        pos: Vec2::new(
            state.viewport.center().x,
            state.viewport.height - MUZZLE_OFFSET_Y,
        ),
        vy: state.tuning.shot_speed,
        radius: PROJECTILE_RADIUS,
        pierce,
        hit_enemies: Vec::new(),
    });
    true
}

/// Danger indicator: the idle penalty is currently active
pub fn is_idle_penalized(state: &GameState) -> bool {
    state.player.idle_ticks > state.tuning.idle_threshold_ticks
}
