//! Authoritative player registry
//!
//! Holds every joined player and mediates all changes to them. Each handler
//! mutates the registry and tells the other connections about it through a
//! [`Channel`]. Nothing here fails: events about players the registry does
//! not know are logged and dropped, because stale and duplicate messages are
//! normal for a best-effort real-time protocol.

use crate::channel::Channel;
use log::{debug, info, warn};
use shared::{ClientPacket, Player, PlayerId, ServerPacket};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// All players that have joined, keyed by their connection id
///
/// Connection ids are handed out in increasing order, so iteration follows
/// join order.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
        }
    }

    /// A connection was opened. It only becomes a player once it joins.
    pub fn on_connect(&self, client_id: PlayerId, addr: SocketAddr) {
        info!("New player has connected: {} ({})", client_id, addr);
    }

    /// Registers the sender as a player at its requested spawn position
    ///
    /// Everyone else learns about the newcomer, and the newcomer is sent one
    /// announcement per player already present. The newcomer is inserted
    /// only after that catch-up, so it never hears about itself.
    pub fn on_join<C: Channel + ?Sized>(&mut self, channel: &C, client_id: PlayerId, x: f32, y: f32) {
        if self.players.contains_key(&client_id) {
            warn!("Player {} sent a second join, ignoring", client_id);
            return;
        }

        if !is_relayable(x, y) {
            warn!("Player {} joined at unusable position ({}, {}), ignoring", client_id, x, y);
            return;
        }

        let new_player = Player::with_id(client_id, x, y);

        channel.broadcast(
            client_id,
            &ServerPacket::NewPlayer {
                id: client_id,
                x: new_player.x,
                y: new_player.y,
            },
        );

        for (id, existing) in &self.players {
            channel.emit(
                client_id,
                &ServerPacket::NewPlayer {
                    id: *id,
                    x: existing.x,
                    y: existing.y,
                },
            );
        }

        info!("Player {} joined at ({}, {})", client_id, x, y);
        self.players.insert(client_id, new_player);
    }

    /// Overwrites the sender's position and relays it to everyone else
    pub fn on_move<C: Channel + ?Sized>(&mut self, channel: &C, client_id: PlayerId, x: f32, y: f32) {
        if !is_relayable(x, y) {
            warn!("Player {} moved to unusable position ({}, {}), ignoring", client_id, x, y);
            return;
        }

        let Some(player) = self.players.get_mut(&client_id) else {
            warn!("Player not found: {}", client_id);
            return;
        };

        player.set_position(x, y);
        debug!("Player {} moved to ({}, {})", client_id, x, y);

        channel.broadcast(
            client_id,
            &ServerPacket::MovePlayer {
                id: client_id,
                x: player.x,
                y: player.y,
            },
        );
    }

    /// Drops the player owned by a closed connection
    pub fn on_disconnect<C: Channel + ?Sized>(&mut self, channel: &C, client_id: PlayerId) {
        info!("Player has disconnected: {}", client_id);

        if self.players.remove(&client_id).is_none() {
            warn!("Player not found: {}", client_id);
            return;
        }

        channel.broadcast(client_id, &ServerPacket::RemovePlayer { id: client_id });
    }

    /// Routes a decoded client event to its handler
    pub fn handle_packet<C: Channel + ?Sized>(
        &mut self,
        channel: &C,
        client_id: PlayerId,
        packet: ClientPacket,
    ) {
        match packet {
            ClientPacket::Join { x, y } => self.on_join(channel, client_id, x, y),
            ClientPacket::Move { x, y } => self.on_move(channel, client_id, x, y),
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players in join order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// JSON has no encoding for infinities or NaN
fn is_relayable(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite()
}
