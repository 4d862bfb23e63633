//! Data-driven game balance
//!
//! Every value is per tick at the 60 Hz simulation rate unless noted.
//! JSON overrides may name any subset of fields; the rest keep their defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player movement per tick
    pub player_speed: f32,
    /// Multiplier applied to every enemy kind's base speed
    pub enemy_speed_mult: f32,
    /// Vertical velocity of player shots (negative = up)
    pub shot_speed: f32,
    pub damage_per_hit: f32,
    pub fire_cooldown_ticks: u32,
    pub aura_per_shot: f32,
    pub aura_regen: f32,
    pub aura_per_kill: f32,
    pub max_health: f32,
    pub idle_threshold_ticks: u32,
    pub idle_health_drain: f32,
    pub idle_aura_drain: f32,
    pub enemies_per_level: u32,
    pub level_up_health_bonus: f32,
    /// Freeze play and offer three pacts on each level-up
    pub pact_on_level_up: bool,
    pub kill_score: u64,
    pub level_up_score: u64,
    /// Enemies per rift at level 1
    pub rift_spawn_base: u32,
    pub rift_spawn_max: u32,
    pub dash_distance: f32,
    pub dash_cooldown_ticks: u32,
    pub dash_invuln_ticks: u32,
    pub linear_shot_damage: f32,
    pub charged_shot_damage: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 4.5 * 1.35,
            enemy_speed_mult: 1.6,
            shot_speed: -16.0,
            damage_per_hit: 20.0,
            fire_cooldown_ticks: 8,
            aura_per_shot: 1.0,
            aura_regen: 0.03,
            aura_per_kill: 5.0,
            max_health: 10_000.0,
            idle_threshold_ticks: 140,
            idle_health_drain: 0.08,
            idle_aura_drain: 0.05,
            enemies_per_level: 20,
            level_up_health_bonus: 1_000.0,
            pact_on_level_up: true,
            kill_score: 100,
            level_up_score: 500,
            rift_spawn_base: 3,
            rift_spawn_max: 8,
            dash_distance: 140.0,
            dash_cooldown_ticks: 90,
            dash_invuln_ticks: 18,
            linear_shot_damage: 10.0,
            charged_shot_damage: 30.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load overrides, keeping defaults if the data is unusable
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring invalid tuning data: {}", e);
                Self::default()
            }
        }
    }

    /// Rift wave size at the given level
    pub fn rift_spawn_for_level(&self, level: u32) -> u32 {
        (self.rift_spawn_base + level.saturating_sub(1)).min(self.rift_spawn_max)
    }
}
