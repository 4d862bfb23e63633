//! Game state and core simulation types
//!
//! One owned `GameState` holds every entity collection plus the player,
//! camera and progression counters. Systems take it by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleGrid;
use crate::consts::*;
use crate::{Tuning, rand_range};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level-up perk choice pending; gameplay frozen
    ChoosingPact,
    /// Player defeated; state kept for the end screen
    GameOver,
}

/// Canvas size in pixels; the player always sits at its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEW_WIDTH,
            height: DEFAULT_VIEW_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Is a screen position more than `margin` outside the visible area?
    pub fn is_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.x > self.width + margin || p.y < -margin || p.y > self.height + margin
    }
}

/// The player-controlled camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Camera offset; world position is camera + screen center
    pub camera: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub aura: f32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Ticks until dash is available again
    pub dash_cooldown: u32,
    /// Ticks of damage immunity left after a dash
    pub dash_invuln: u32,
    /// Consecutive ticks with (near) zero movement
    pub idle_ticks: u32,
}

impl Player {
    pub fn new(max_health: f32) -> Self {
        Self {
            camera: Vec2::ZERO,
            health: max_health,
            max_health,
            aura: AURA_MAX,
            fire_cooldown: 0,
            dash_cooldown: 0,
            dash_invuln: 0,
            idle_ticks: 0,
        }
    }

    #[inline]
    pub fn world_pos(&self, viewport: &Viewport) -> Vec2 {
        self.camera + viewport.center()
    }

    /// Re-establish health ∈ [0, max] and aura ∈ [0, 100]
    pub fn clamp_vitals(&mut self) {
        self.health = self.health.clamp(0.0, self.max_health);
        self.aura = self.aura.clamp(0.0, AURA_MAX);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.dash_invuln > 0
    }
}

/// A player shot (screen space, travels straight up)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vy: f32,
    pub radius: f32,
    /// Extra enemies this shot may pass through
    pub pierce: u32,
    /// Enemies already struck, so a piercing shot never hits one twice
    #[serde(skip)]
    pub hit_enemies: Vec<u32>,
}

/// Enemy shot flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    Linear,
    Charged,
}

/// An enemy shot (screen space, fixed velocity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub kind: ShotKind,
}

/// Ranged attack an enemy kind is capable of
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attack {
    None,
    Linear { range: f32 },
    Charged { range: f32, chance: f64 },
}

/// Per-kind behavior parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Base speed before the global enemy speed multiplier
    pub speed: f32,
    pub hp: f32,
    pub attack: Attack,
    /// Slows to a crawl when about to fire
    pub stop_to_shoot: bool,
    /// Randomized cooldown range between attacks (ticks)
    pub rate: (f32, f32),
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Chases and fires straight shots
    Grunt,
    /// Fast chaser, no ranged attack
    Swarmer,
    /// Plants itself to shoot
    Gunner,
    /// Charges up heavy shots
    Warlock,
}

impl EnemyKind {
    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Grunt => EnemyProfile {
                speed: 0.7,
                hp: 30.0,
                attack: Attack::Linear { range: 1200.0 },
                stop_to_shoot: false,
                rate: (45.0, 85.0),
            },
            EnemyKind::Swarmer => EnemyProfile {
                speed: 1.2,
                hp: 20.0,
                attack: Attack::None,
                stop_to_shoot: false,
                rate: (0.0, 0.0),
            },
            EnemyKind::Gunner => EnemyProfile {
                speed: 0.55,
                hp: 40.0,
                attack: Attack::Linear { range: 650.0 },
                stop_to_shoot: true,
                rate: (60.0, 100.0),
            },
            EnemyKind::Warlock => EnemyProfile {
                speed: 0.45,
                hp: 60.0,
                attack: Attack::Charged {
                    range: 900.0,
                    chance: 0.6,
                },
                stop_to_shoot: true,
                rate: (90.0, 150.0),
            },
        }
    }
}

/// Wind-up of a charged shot in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Ticks until release
    pub timer: u32,
    /// 0..=1, grows linearly over the charge duration
    pub windup: f32,
}

/// An enemy (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    pub hp: f32,
    pub max_hp: f32,
    /// Animation phase, also drives the sideways wobble
    pub phase: f32,
    pub shoot_cooldown: u32,
    pub charge: Option<Charge>,
}

/// A temporary enemy spawner (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rift {
    pub pos: Vec2,
    /// Ticks left before the rift closes
    pub life: u32,
    pub pulse: f32,
    pub rotation: f32,
    pub spawn_left: u32,
}

/// Particle palette, resolved to colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Spawn,
    Hit,
    Death,
    PlayerHit,
    LevelUp,
    Dash,
}

/// Cosmetic particle (screen space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub radius: f32,
    pub color: ParticleColor,
}

impl Particle {
    /// Opacity fades linearly with remaining life
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }
}

/// Shared modifiers that pacts mutate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerkState {
    pub aura_regen_mult: f32,
    pub piercing_shots: bool,
    pub dash_cooldown_mult: f32,
}

impl Default for PerkState {
    fn default() -> Self {
        Self {
            aura_regen_mult: 1.0,
            piercing_shots: false,
            dash_cooldown_mult: 1.0,
        }
    }
}

/// Perks offered on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pact {
    AuraSurge,
    Piercing,
    Tailwind,
    DeepWell,
    Phantom,
}

impl Pact {
    pub const ALL: [Pact; 5] = [
        Pact::AuraSurge,
        Pact::Piercing,
        Pact::Tailwind,
        Pact::DeepWell,
        Pact::Phantom,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Pact::AuraSurge => "Pact of the Surge",
            Pact::Piercing => "Pact of the Needle",
            Pact::Tailwind => "Pact of the Wind",
            Pact::DeepWell => "Pact of the Well",
            Pact::Phantom => "Pact of the Phantom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Pact::AuraSurge => "Aura regenerates 50% faster",
            Pact::Piercing => "Shots pierce through two extra enemies",
            Pact::Tailwind => "Dash recharges 25% faster",
            Pact::DeepWell => "Aura regenerates 25% faster and dash recharges 10% faster",
            Pact::Phantom => "Dash recharges 40% faster",
        }
    }

    pub fn apply(self, perks: &mut PerkState) {
        match self {
            Pact::AuraSurge => perks.aura_regen_mult *= 1.5,
            Pact::Piercing => perks.piercing_shots = true,
            Pact::Tailwind => perks.dash_cooldown_mult *= 0.75,
            Pact::DeepWell => {
                perks.aura_regen_mult *= 1.25;
                perks.dash_cooldown_mult *= 0.9;
            }
            Pact::Phantom => perks.dash_cooldown_mult *= 0.6,
        }
    }
}

/// Three pacts on offer while the game waits for a choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactChoice {
    pub offered: [Pact; 3],
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub level: u32,
    pub score: u64,
    pub kills: u32,
    pub kills_this_level: u32,
    /// Enemies each new rift will release
    pub rift_spawn_count: u32,
    /// Ticks until the next rift opens
    pub rift_timer: u32,
    pub player: Player,
    pub perks: PerkState,
    pub pact_choice: Option<PactChoice>,
    pub obstacles: ObstacleGrid,
    pub rifts: Vec<Rift>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning and streamed obstacles
    pub fn new(seed: u64) -> Self {
        Self::with_config(
            seed,
            Tuning::default(),
            Viewport::default(),
            ObstacleGrid::new(seed),
        )
    }

    pub fn with_config(
        seed: u64,
        tuning: Tuning,
        viewport: Viewport,
        obstacles: ObstacleGrid,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let rift_timer = rand_range(&mut rng, RIFT_INTERVAL_MIN, RIFT_INTERVAL_MAX) as u32;
        let player = Player::new(tuning.max_health);
        let rift_spawn_count = tuning.rift_spawn_for_level(1);

        let mut state = Self {
            seed,
            rng,
            tuning,
            viewport,
            phase: GamePhase::Playing,
            time_ticks: 0,
            level: 1,
            score: 0,
            kills: 0,
            kills_this_level: 0,
            rift_spawn_count,
            rift_timer,
            player,
            perks: PerkState::default(),
            pact_choice: None,
            obstacles,
            rifts: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            next_id: 1,
        };

        let start = state.player_world_pos();
        state.obstacles.ensure_around(start);
        state.clear_spawn_point();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn player_world_pos(&self) -> Vec2 {
        self.player.world_pos(&self.viewport)
    }

    pub fn is_active(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    /// Resize the canvas; the player stays at the same world position
    pub fn resize(&mut self, viewport: Viewport) {
        let world = self.player_world_pos();
        self.viewport = viewport;
        self.player.camera = world - viewport.center();
    }

    /// Shift the camera until the player is not standing inside an obstacle
    fn clear_spawn_point(&mut self) {
        let step = Vec2::new(CHUNK_MARGIN, CHUNK_MARGIN * 0.5);
        for _ in 0..64 {
            if !self.obstacles.blocks_circle(self.player_world_pos(), PLAYER_RADIUS) {
                return;
            }
            self.player.camera += step;
        }
        log::warn!("No clear spawn point found near the origin");
    }
}
