//! Player preferences: visual quality and the music shell
//!
//! Persisted in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

/// Background music rotation
pub const TRACKS: [&str; 3] = [
    "Ancestral War Circle",
    "Forest Masks at Dusk",
    "Neon Mask Ritual",
];

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 1536,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (hits, deaths, dashes)
    pub particles: bool,

    // === Music ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Index into `TRACKS`
    pub track_index: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            music_volume: 0.35,
            muted: false,
            track_index: 0,
        }
    }
}

impl Settings {
    /// Switch preset by name; unknown names leave the preset unchanged
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::parse(name) {
            Some(preset) => {
                self.quality = preset;
                log::info!(
                    "Quality set to {} ({} particles)",
                    preset.as_str(),
                    self.max_particles()
                );
                true
            }
            None => {
                log::debug!("Unknown quality preset {:?}", name);
                false
            }
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Music {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Advance to the next track, wrapping around
    pub fn next_track(&mut self) -> &'static str {
        self.track_index = (self.track_index + 1) % TRACKS.len();
        let name = self.current_track();
        log::info!("Now playing: {}", name);
        name
    }

    pub fn current_track(&self) -> &'static str {
        TRACKS[self.track_index % TRACKS.len()]
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.music_volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Volume the audio element should play at
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "placman_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
