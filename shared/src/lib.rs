//! Types shared by the server and the client: the player entity, the
//! directional key state that drives local movement, the draw surface the
//! renderer exposes, and the wire protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod protocol;

pub use protocol::{ClientPacket, ProtocolError, ServerPacket};

/// Distance a player moves along each axis in one animation frame.
pub const PLAYER_SPEED: f32 = 2.0;
/// Side length of the square avatar.
pub const PLAYER_SIZE: f32 = 10.0;
pub const DEFAULT_PORT: u16 = 8000;

/// Server-assigned connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything a player can be drawn onto.
pub trait Surface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

/// Held state of the four movement keys.
///
/// Flags are set on press and cleared on release; pressing an already-held
/// key changes nothing, so auto-repeat never accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub down: bool,
}

impl KeyState {
    pub fn new(up: bool, left: bool, right: bool, down: bool) -> Self {
        Self {
            up,
            left,
            right,
            down,
        }
    }

    pub fn on_key_down(&mut self, direction: Direction) {
        *self.flag_mut(direction) = true;
    }

    pub fn on_key_up(&mut self, direction: Direction) {
        *self.flag_mut(direction) = false;
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Down => self.down,
        }
    }

    fn flag_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Down => &mut self.down,
        }
    }
}

/// A player avatar. `id` stays `None` for a client's own player, which the
/// server never echoes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: Option<PlayerId>,
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self { id: None, x, y }
    }

    pub fn with_id(id: PlayerId, x: f32, y: f32) -> Self {
        Self { id: Some(id), x, y }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Applies one frame of movement and reports whether the position changed.
    ///
    /// Right wins over left when both are held, up wins over down. No bounds
    /// are enforced.
    pub fn update(&mut self, keys: &KeyState) -> bool {
        let (prev_x, prev_y) = self.position();

        if keys.right {
            self.x += PLAYER_SPEED;
        } else if keys.left {
            self.x -= PLAYER_SPEED;
        }

        if keys.up {
            self.y -= PLAYER_SPEED;
        } else if keys.down {
            self.y += PLAYER_SPEED;
        }

        prev_x != self.x || prev_y != self.y
    }

    /// Draws the avatar as a square centred on the player's position.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let half = PLAYER_SIZE / 2.0;
        surface.fill_rect(self.x - half, self.y - half, PLAYER_SIZE, PLAYER_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[derive(Default)]
    struct RecordingSurface {
        filled: Vec<(f32, f32, f32, f32)>,
    }

    impl Surface for RecordingSurface {
        fn clear_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {}

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.filled.push((x, y, width, height));
        }
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(100.0, 200.0);
        assert_eq!(player.id, None);
        assert_eq!(player.position(), (100.0, 200.0));

        let remote = Player::with_id(PlayerId(7), 1.0, 2.0);
        assert_eq!(remote.id, Some(PlayerId(7)));
    }

    #[test]
    fn test_update_right_beats_left_and_up_applies() {
        let mut player = Player::new(50.0, 50.0);
        let keys = KeyState::new(true, false, true, false);

        assert!(player.update(&keys));
        assert_approx_eq!(player.x, 50.0 + PLAYER_SPEED);
        assert_approx_eq!(player.y, 50.0 - PLAYER_SPEED);
    }

    #[test]
    fn test_update_both_horizontal_keys_held() {
        let mut player = Player::new(0.0, 0.0);
        let keys = KeyState::new(false, true, true, false);

        assert!(player.update(&keys));
        assert_approx_eq!(player.x, PLAYER_SPEED);
        assert_approx_eq!(player.y, 0.0);
    }

    #[test]
    fn test_update_up_beats_down() {
        let mut player = Player::new(0.0, 0.0);
        let keys = KeyState::new(true, false, false, true);

        player.update(&keys);
        assert_approx_eq!(player.y, -PLAYER_SPEED);
    }

    #[test]
    fn test_update_left_and_down() {
        let mut player = Player::new(10.0, 10.0);
        let keys = KeyState::new(false, true, false, true);

        assert!(player.update(&keys));
        assert_approx_eq!(player.x, 10.0 - PLAYER_SPEED);
        assert_approx_eq!(player.y, 10.0 + PLAYER_SPEED);
    }

    #[test]
    fn test_update_without_keys_reports_no_change() {
        let mut player = Player::new(10.0, 10.0);
        assert!(!player.update(&KeyState::default()));
        assert_eq!(player.position(), (10.0, 10.0));
    }

    #[test]
    fn test_update_does_not_clamp_to_screen() {
        let mut player = Player::new(0.0, 0.0);
        let keys = KeyState::new(true, true, false, false);

        for _ in 0..10 {
            player.update(&keys);
        }
        assert_approx_eq!(player.x, -10.0 * PLAYER_SPEED);
        assert_approx_eq!(player.y, -10.0 * PLAYER_SPEED);
    }

    #[test]
    fn test_key_state_press_and_release() {
        let mut keys = KeyState::default();

        keys.on_key_down(Direction::Left);
        keys.on_key_down(Direction::Left);
        assert!(keys.is_held(Direction::Left));
        assert!(!keys.is_held(Direction::Right));

        keys.on_key_up(Direction::Left);
        assert!(!keys.is_held(Direction::Left));
        assert_eq!(keys, KeyState::default());
    }

    #[test]
    fn test_key_release_without_press() {
        let mut keys = KeyState::default();
        keys.on_key_up(Direction::Down);
        assert!(!keys.down);
    }

    #[test]
    fn test_draw_centres_avatar() {
        let player = Player::new(40.0, 60.0);
        let mut surface = RecordingSurface::default();

        player.draw(&mut surface);

        let half = PLAYER_SIZE / 2.0;
        assert_eq!(
            surface.filled,
            vec![(40.0 - half, 60.0 - half, PLAYER_SIZE, PLAYER_SIZE)]
        );
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(42).to_string(), "42");
    }
}
