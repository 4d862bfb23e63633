//! PLACMAN - top-down rift shooter
//!
//! Core modules:
//! - `sim`: Simulation (movement, obstacles, enemies, hit resolution, progression)
//! - `input`: Key mapping for the input shell
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (particles, music)
//! - `web`: wasm-bindgen facade driven by the browser's animation frame

pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::InputState;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the cadence all per-tick values are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport
    pub const DEFAULT_VIEW_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 720.0;

    /// Obstacle streaming
    pub const CHUNK_SIZE: f32 = 900.0;
    pub const OBSTACLES_PER_CHUNK: usize = 10;
    pub const CHUNK_MARGIN: f32 = 60.0;
    pub const OBSTACLE_MIN_SIZE: f32 = 60.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 220.0;
    /// Chunks farther than this (in either axis) from the player's chunk are evicted
    pub const CHUNK_KEEP_RADIUS: i32 = 2;

    /// Player
    pub const PLAYER_RADIUS: f32 = 22.0;
    pub const AURA_MAX: f32 = 100.0;
    /// Minimum per-tick displacement that counts as moving
    pub const IDLE_EPSILON: f32 = 0.2;
    /// Player shots leave from this far above the bottom edge
    pub const MUZZLE_OFFSET_Y: f32 = 140.0;

    /// Player projectile
    pub const PROJECTILE_RADIUS: f32 = 7.0;
    pub const PROJECTILE_TOP_BOUND: f32 = -50.0;
    pub const PIERCE_WITH_PACT: u32 = 2;

    /// Enemy projectiles are dropped this far outside the viewport
    pub const OFFSCREEN_MARGIN: f32 = 80.0;
    pub const LINEAR_SHOT_SPEED: f32 = 6.5;
    pub const LINEAR_SHOT_RADIUS: f32 = 5.0;
    pub const CHARGED_SHOT_SPEED: f32 = 5.0;
    pub const CHARGED_SHOT_RADIUS: f32 = 11.0;
    pub const CHARGE_DURATION_TICKS: u32 = 60;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 18.0;
    pub const ENEMY_PHASE_STEP: f32 = 0.05;
    pub const ENEMY_WOBBLE: f32 = 0.2;

    /// Rifts
    pub const RIFT_LIFETIME: u32 = 420;
    pub const RIFT_SPAWN_WINDOW: u32 = 380;
    pub const RIFT_SPAWN_PERIOD: u32 = 25;
    pub const RIFT_RADIUS: f32 = 40.0;
    pub const RIFT_INTERVAL_MIN: f32 = 140.0;
    pub const RIFT_INTERVAL_MAX: f32 = 240.0;
    pub const RIFT_INTERVAL_FLOOR: f32 = 60.0;
    pub const RIFT_PLACEMENT_ATTEMPTS: u32 = 8;

    /// Particles
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_DRAG: f32 = 0.98;
    pub const MAX_PARTICLES: usize = 512;

    /// Manual wave
    pub const MANUAL_WAVE_SIZE: u32 = 10;

    /// Minimap covers this many world units in each direction
    pub const MAP_RANGE: f32 = 2200.0;
}

/// Uniform sample in `[min, max)`; collapses to `min` for an empty range
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Convert a world position to screen space for the given camera offset
#[inline]
pub fn world_to_screen(world: Vec2, camera: Vec2) -> Vec2 {
    world - camera
}

/// Convert a screen position to world space for the given camera offset
#[inline]
pub fn screen_to_world(screen: Vec2, camera: Vec2) -> Vec2 {
    screen + camera
}
