//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod combat;
pub mod director;
pub mod enemy;
pub mod geometry;
pub mod obstacles;
pub mod particles;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use geometry::{Rect, circle_intersects_rect, line_of_sight, point_in_rect, segment_intersects_rect};
pub use obstacles::{ChunkKey, Obstacle, ObstacleGrid, ObstacleKind};
pub use snapshot::{MapPoint, RenderSnapshot, Sensor, minimap_point, nearest_enemy};
pub use state::{
    Enemy, EnemyKind, EnemyProjectile, GamePhase, GameState, Pact, PactChoice, Particle,
    ParticleColor, PerkState, Player, Projectile, Rift, ShotKind, Viewport,
};
pub use tick::{FrameDriver, TickInput, tick};
