//! Keyboard input for steering the camera.
//!
//! Movement keys are read as held axes every frame; toggles fire once per
//! press.

use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Input state tracking
pub struct InputState {
    /// Keys currently held down
    pub keys_held: HashSet<KeyCode>,
    /// Keys pressed since the last frame (consumed by `process_keyboard`)
    pub keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    fn axis(&self, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
        let held = |keys: &[KeyCode]| keys.iter().any(|k| self.keys_held.contains(k));
        match (held(negative), held(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of processing input
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputResult {
    pub toggle_fullscreen: bool,
    pub toggle_debug_panel: bool,
    /// -1 turns left, +1 turns right
    pub turn_axis: f32,
    /// +1 moves forward
    pub move_axis: f32,
    /// +1 raises the camera
    pub climb_axis: f32,
}

/// Process keyboard input and return this frame's actions
pub fn process_keyboard(input: &mut InputState) -> InputResult {
    let mut result = InputResult {
        turn_axis: input.axis(&[KeyCode::KeyA, KeyCode::ArrowLeft], &[KeyCode::KeyD, KeyCode::ArrowRight]),
        move_axis: input.axis(&[KeyCode::KeyS, KeyCode::ArrowDown], &[KeyCode::KeyW, KeyCode::ArrowUp]),
        climb_axis: input.axis(&[KeyCode::KeyQ], &[KeyCode::KeyE]),
        ..Default::default()
    };

    if input.keys_pressed.remove(&KeyCode::F11) {
        result.toggle_fullscreen = true;
    }
    if input.keys_pressed.remove(&KeyCode::F1) {
        result.toggle_debug_panel = true;
    }
    input.keys_pressed.clear();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_become_axes() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ArrowLeft);

        let result = process_keyboard(&mut input);
        assert_eq!(result.move_axis, 1.0);
        assert_eq!(result.turn_axis, -1.0);
        assert_eq!(result.climb_axis, 0.0);

        // Still held next frame
        assert_eq!(process_keyboard(&mut input).move_axis, 1.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyQ);
        input.press(KeyCode::KeyE);
        assert_eq!(process_keyboard(&mut input).climb_axis, 0.0);
    }

    #[test]
    fn test_toggles_fire_once() {
        let mut input = InputState::new();
        input.press(KeyCode::F1);
        assert!(process_keyboard(&mut input).toggle_debug_panel);
        assert!(!process_keyboard(&mut input).toggle_debug_panel);

        // Key repeat while held doesn't retrigger
        input.press(KeyCode::F1);
        assert!(!process_keyboard(&mut input).toggle_debug_panel);

        input.release(KeyCode::F1);
        input.press(KeyCode::F1);
        assert!(process_keyboard(&mut input).toggle_debug_panel);
    }
}
