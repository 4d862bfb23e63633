//! Browser facade
//!
//! The page owns the canvas, the animation frame loop, the audio element and
//! the DOM listeners. It forwards events here and draws whatever
//! `snapshot_json` returns.

use wasm_bindgen::prelude::*;

use crate::input::{InputState, ShellAction};
use crate::settings::Settings;
use crate::sim::obstacles::ObstacleGrid;
use crate::sim::{FrameDriver, GameState, RenderSnapshot, Viewport};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("PLACMAN starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    driver: FrameDriver,
    input: InputState,
    settings: Settings,
    tuning: Tuning,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may override any subset of the balance table
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: Option<String>) -> WebGame {
        let tuning = tuning_json
            .as_deref()
            .map(Tuning::from_json_or_default)
            .unwrap_or_default();
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let state = new_state(seed, tuning.clone(), Viewport::new(width, height), &settings);
        log::info!("New run with seed {}", state.seed);

        WebGame {
            state,
            driver: FrameDriver::new(),
            input: InputState::new(),
            settings,
            tuning,
        }
    }

    /// Full reset with a fresh seed
    pub fn restart(&mut self) {
        let seed = js_sys::Date::now() as u64;
        self.state = new_state(seed, self.tuning.clone(), self.state.viewport, &self.settings);
        self.driver = FrameDriver::new();
        self.input.release_all();
        log::info!("Restarted with seed {}", self.state.seed);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(Viewport::new(width, height));
    }

    /// Returns true if the key changed music state (the page should refresh audio)
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.input.set_key(key, true) {
            Some(ShellAction::ToggleMute) => {
                self.settings.toggle_mute();
            }
            Some(ShellAction::NextTrack) => {
                self.settings.next_track();
            }
            None => return false,
        }
        self.settings.save();
        true
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.set_key(key, false);
    }

    pub fn pointer_fire(&mut self) {
        self.input.pointer_fire();
    }

    pub fn choose_pact(&mut self, index: usize) {
        self.input.choose_pact(index);
    }

    /// Window lost focus
    pub fn blur(&mut self) {
        self.input.release_all();
    }

    /// Advance by a frame delta in milliseconds; returns ticks run
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        let input = self.input.frame_input();
        let ticks = self.driver.advance(&mut self.state, &input, (dt_ms / 1000.0) as f32);
        if ticks > 0 {
            self.input.consume_click();
        }
        ticks
    }

    /// Render interpolation factor in [0, 1]
    pub fn alpha(&self) -> f32 {
        self.driver.alpha()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RenderSnapshot::capture(&self.state))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn minimap_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RenderSnapshot::capture(&self.state).minimap())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn game_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn volume(&self) -> f32 {
        self.settings.effective_volume()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.settings.save();
    }

    /// Switch quality preset ("low", "medium", "high"); caps live particles at once
    pub fn set_quality(&mut self, name: &str) -> bool {
        if !self.settings.set_quality(name) {
            return false;
        }
        self.state.particle_cap = self.settings.max_particles();
        self.state.particles.truncate(self.state.particle_cap);
        self.settings.save();
        true
    }

    pub fn quality(&self) -> String {
        self.settings.quality.as_str().to_string()
    }

    pub fn muted(&self) -> bool {
        self.settings.muted
    }

    pub fn track_name(&self) -> String {
        self.settings.current_track().to_string()
    }
}

fn new_state(seed: u64, tuning: Tuning, viewport: Viewport, settings: &Settings) -> GameState {
    let mut state = GameState::with_config(seed, tuning, viewport, ObstacleGrid::new(seed));
    state.particle_cap = settings.max_particles();
    state
}
