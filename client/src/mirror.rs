//! Client-side mirror of the server's player registry
//!
//! The mirror owns the local player outright and keeps a cache of every other
//! player, built only from server pushes. Events about unknown ids are logged
//! and ignored; with best-effort delivery they are expected, not errors.

use log::{debug, info, warn};
use rand::Rng;
use shared::{ClientPacket, KeyState, Player, PlayerId, ServerPacket, PLAYER_SIZE};
use std::collections::BTreeMap;

/// Picks a spawn position inside a `width` x `height` viewport
///
/// Avatars are drawn centred on their position, so half an avatar of margin
/// on each edge keeps the whole square on screen.
pub fn random_spawn<R: Rng>(rng: &mut R, width: f32, height: f32) -> (f32, f32) {
    (
        random_coordinate(rng, width),
        random_coordinate(rng, height),
    )
}

fn random_coordinate<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    let min = PLAYER_SIZE / 2.0;
    let max = extent - min;
    if !(max > min) {
        return min;
    }
    rng.gen_range(min..max).floor()
}

#[derive(Debug, Clone)]
pub struct PlayerMirror {
    local: Player,
    remote: BTreeMap<PlayerId, Player>,
}

impl PlayerMirror {
    pub fn new(local: Player) -> Self {
        Self {
            local,
            remote: BTreeMap::new(),
        }
    }

    /// Creates a mirror whose local player starts at a random position
    pub fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        let (x, y) = random_spawn(rng, width, height);
        Self::new(Player::new(x, y))
    }

    pub fn local(&self) -> &Player {
        &self.local
    }

    pub fn remote(&self, id: PlayerId) -> Option<&Player> {
        self.remote.get(&id)
    }

    pub fn remote_players(&self) -> impl Iterator<Item = &Player> {
        self.remote.values()
    }

    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    pub fn on_new_player(&mut self, id: PlayerId, x: f32, y: f32) {
        if self.remote.contains_key(&id) {
            debug!("Player {} already known, ignoring announcement", id);
            return;
        }

        info!("New player connected: {}", id);
        self.remote.insert(id, Player::with_id(id, x, y));
    }

    pub fn on_move_player(&mut self, id: PlayerId, x: f32, y: f32) {
        match self.remote.get_mut(&id) {
            Some(player) => player.set_position(x, y),
            None => warn!("Player not found: {}", id),
        }
    }

    pub fn on_remove_player(&mut self, id: PlayerId) {
        if self.remote.remove(&id).is_none() {
            warn!("Player not found: {}", id);
        } else {
            info!("Player {} left", id);
        }
    }

    /// Applies one server event to the remote cache
    pub fn apply(&mut self, packet: ServerPacket) {
        match packet {
            ServerPacket::NewPlayer { id, x, y } => self.on_new_player(id, x, y),
            ServerPacket::MovePlayer { id, x, y } => self.on_move_player(id, x, y),
            ServerPacket::RemovePlayer { id } => self.on_remove_player(id),
        }
    }

    /// Moves the local player one frame; true when it actually moved
    pub fn update(&mut self, keys: &KeyState) -> bool {
        self.local.update(keys)
    }

    pub fn join_packet(&self) -> ClientPacket {
        ClientPacket::Join {
            x: self.local.x,
            y: self.local.y,
        }
    }

    pub fn move_packet(&self) -> ClientPacket {
        ClientPacket::Move {
            x: self.local.x,
            y: self.local.y,
        }
    }
}
