//! Read-only view handed to the renderer each frame
//!
//! Nothing here mutates the simulation. Obstacles, rifts and enemies are in
//! world space (subtract `camera` to draw them); shots and particles are
//! already in screen space.

use glam::Vec2;
use serde::Serialize;

use super::obstacles::Obstacle;
use super::player::is_idle_penalized;
use super::state::{
    Enemy, EnemyProjectile, GamePhase, GameState, Particle, Projectile, Rift,
};
use crate::consts::MAP_RANGE;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub world_pos: Vec2,
    pub screen_pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub aura: f32,
    pub dash_cooldown: u32,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PactView {
    pub title: &'static str,
    pub description: &'static str,
}

/// Direction and distance to the closest enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sensor {
    pub direction: Vec2,
    pub distance: f32,
}

/// A target placed on the minimap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    /// Offset from the player scaled to -1..=1 on each axis
    pub offset: Vec2,
    /// The target was outside the map range and pinned to the edge
    pub clipped: bool,
}

/// Everything the renderer draws for one frame
#[derive(Debug, Serialize)]
pub struct RenderSnapshot<'a> {
    pub camera: Vec2,
    pub player: PlayerView,
    pub obstacles: &'a [Obstacle],
    pub rifts: &'a [Rift],
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub enemy_projectiles: &'a [EnemyProjectile],
    pub particles: &'a [Particle],
    pub level: u32,
    pub score: u64,
    pub kills: u32,
    pub kills_this_level: u32,
    pub enemies_per_level: u32,
    /// Non-empty only while a pact choice is pending
    pub pact_choice: Vec<PactView>,
    pub choosing_pact: bool,
    /// Idle penalty active
    pub danger: bool,
    pub game_active: bool,
    pub paused: bool,
    pub nearest_enemy: Option<Sensor>,
}

impl<'a> RenderSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let player = &state.player;
        let pact_choice: Vec<PactView> = state
            .pact_choice
            .as_ref()
            .map(|c| {
                c.offered
                    .iter()
                    .map(|p| PactView {
                        title: p.title(),
                        description: p.description(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            camera: player.camera,
            player: PlayerView {
                world_pos: state.player_world_pos(),
                screen_pos: state.viewport.center(),
                health: player.health,
                max_health: player.max_health,
                aura: player.aura,
                dash_cooldown: player.dash_cooldown,
                invulnerable: player.is_invulnerable(),
            },
            obstacles: state.obstacles.obstacles(),
            rifts: &state.rifts,
            enemies: &state.enemies,
            projectiles: &state.projectiles,
            enemy_projectiles: &state.enemy_projectiles,
            particles: &state.particles,
            level: state.level,
            score: state.score,
            kills: state.kills,
            kills_this_level: state.kills_this_level,
            enemies_per_level: state.tuning.enemies_per_level,
            pact_choice,
            choosing_pact: state.phase == GamePhase::ChoosingPact,
            danger: is_idle_penalized(state),
            game_active: state.is_active(),
            paused: state.phase == GamePhase::Paused,
            nearest_enemy: nearest_enemy(state),
        }
    }

    /// Minimap markers for every rift and enemy
    pub fn minimap(&self) -> Vec<MapPoint> {
        let origin = self.player.world_pos;
        self.rifts
            .iter()
            .map(|r| r.pos)
            .chain(self.enemies.iter().map(|e| e.pos))
            .map(|target| minimap_point(origin, target, MAP_RANGE))
            .collect()
    }
}

/// Closest enemy to the player, if any
pub fn nearest_enemy(state: &GameState) -> Option<Sensor> {
    let player = state.player_world_pos();
    state
        .enemies
        .iter()
        .map(|e| e.pos - player)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
        .map(|delta| {
            let distance = delta.length();
            Sensor {
                direction: if distance > 0.0 {
                    delta / distance
                } else {
                    Vec2::ZERO
                },
                distance,
            }
        })
}

/// Place a target on a square minimap centered on the player
pub fn minimap_point(player: Vec2, target: Vec2, range: f32) -> MapPoint {
    let scaled = (target - player) / range.max(1.0);
    let clipped = scaled.x.abs() > 1.0 || scaled.y.abs() > 1.0;
    MapPoint {
        offset: scaled.clamp(Vec2::splat(-1.0), Vec2::ONE),
        clipped,
    }
}
