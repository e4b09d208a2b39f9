//! Keyboard sampling into the shared movement key state

use macroquad::prelude::{is_key_pressed, is_key_released, KeyCode};
use shared::{Direction, KeyState};

/// Every key bound to a direction: ZQSD (AZERTY), WASD and the arrows.
const BOUND_KEYS: [KeyCode; 10] = [
    KeyCode::Z,
    KeyCode::Q,
    KeyCode::S,
    KeyCode::D,
    KeyCode::W,
    KeyCode::A,
    KeyCode::Up,
    KeyCode::Left,
    KeyCode::Down,
    KeyCode::Right,
];

pub fn direction_for(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Z | KeyCode::W | KeyCode::Up => Some(Direction::Up),
        KeyCode::Q | KeyCode::A | KeyCode::Left => Some(Direction::Left),
        KeyCode::D | KeyCode::Right => Some(Direction::Right),
        KeyCode::S | KeyCode::Down => Some(Direction::Down),
        _ => None,
    }
}

fn slot(key: KeyCode) -> Option<usize> {
    BOUND_KEYS.iter().position(|bound| *bound == key)
}

/// Turns key press and release edges into held direction flags
///
/// Each bound key is tracked on its own; a direction stays held while any
/// of its keys is down.
#[derive(Debug, Default)]
pub struct InputSampler {
    held: [bool; BOUND_KEYS.len()],
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: KeyCode) {
        if let Some(i) = slot(key) {
            self.held[i] = true;
        }
    }

    pub fn on_key_up(&mut self, key: KeyCode) {
        if let Some(i) = slot(key) {
            self.held[i] = false;
        }
    }

    pub fn keys(&self) -> KeyState {
        let mut keys = KeyState::default();
        for (key, _) in BOUND_KEYS.iter().zip(self.held).filter(|(_, held)| *held) {
            if let Some(direction) = direction_for(*key) {
                keys.on_key_down(direction);
            }
        }
        keys
    }

    /// Reads this frame's press/release edges from the window and returns
    /// the resulting key state
    pub fn sample(&mut self) -> KeyState {
        for key in BOUND_KEYS {
            if is_key_pressed(key) {
                self.on_key_down(key);
            }
            if is_key_released(key) {
                self.on_key_up(key);
            }
        }
        self.keys()
    }
}
