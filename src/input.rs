//! Keyboard and pointer mapping for the input shell
//!
//! Both AZERTY (ZQSD) and QWERTY (WASD) layouts work, plus the arrow keys.
//! Music keys never reach the simulation; they come back as `ShellAction`s.

use crate::sim::TickInput;

/// Events for the audio shell rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    ToggleMute,
    NextTrack,
}

/// Held keys plus one-shot events waiting for the next frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: TickInput,
    pending: TickInput,
    click: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key event (DOM `KeyboardEvent.key` naming)
    pub fn set_key(&mut self, key: &str, pressed: bool) -> Option<ShellAction> {
        let key = if key.chars().count() == 1 {
            key.to_lowercase()
        } else {
            key.to_string()
        };

        match key.as_str() {
            "z" | "w" | "ArrowUp" => self.held.up = pressed,
            "s" | "ArrowDown" => self.held.down = pressed,
            "q" | "a" | "ArrowLeft" => self.held.left = pressed,
            "d" | "ArrowRight" => self.held.right = pressed,
            "Shift" => self.held.dash = pressed,
            " " => self.held.fire = pressed,
            _ if !pressed => {}
            "p" | "Escape" => self.pending.pause = true,
            "e" => self.pending.spawn_wave = true,
            "1" => self.pending.pact_choice = Some(0),
            "2" => self.pending.pact_choice = Some(1),
            "3" => self.pending.pact_choice = Some(2),
            "m" => return Some(ShellAction::ToggleMute),
            "n" => return Some(ShellAction::NextTrack),
            _ => {}
        }
        None
    }

    /// Single shot from a click or tap
    pub fn pointer_fire(&mut self) {
        self.click = true;
    }

    /// Pick a pact from an on-screen button
    pub fn choose_pact(&mut self, index: usize) {
        self.pending.pact_choice = Some(index);
    }

    /// Input for this frame; one-shot key events are handed over once
    pub fn frame_input(&mut self) -> TickInput {
        let mut input = self.held.clone();
        input.fire |= self.click;
        input.merge_one_shots(&self.pending);
        self.pending.clear_one_shots();
        input
    }

    /// Call once a tick has actually consumed the pointer shot
    pub fn consume_click(&mut self) {
        self.click = false;
    }

    /// Drop everything held (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.held = TickInput::default();
        self.click = false;
    }
}
