//! Client game state machine
//!
//! Ties the mirror to the connection lifecycle: join once connected, apply
//! server pushes, and turn local movement into move requests. It performs no
//! I/O itself; callers forward the packets it returns.

use crate::mirror::PlayerMirror;
use crate::network::NetworkEvent;
use log::{info, warn};
use shared::{ClientPacket, KeyState, Player};

pub struct ClientGame {
    mirror: PlayerMirror,
    connected: bool,
}

impl ClientGame {
    pub fn new(local: Player) -> Self {
        Self::from_mirror(PlayerMirror::new(local))
    }

    pub fn from_mirror(mirror: PlayerMirror) -> Self {
        Self {
            mirror,
            connected: false,
        }
    }

    pub fn mirror(&self) -> &PlayerMirror {
        &self.mirror
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Applies a network event; returns the join request on connect
    pub fn handle_event(&mut self, event: NetworkEvent) -> Option<ClientPacket> {
        match event {
            NetworkEvent::Connected => {
                info!("Connected, joining at {:?}", self.mirror.local().position());
                self.connected = true;
                Some(self.mirror.join_packet())
            }
            NetworkEvent::Packet(packet) => {
                self.mirror.apply(packet);
                None
            }
            NetworkEvent::Disconnected => {
                // No reconnection: the game keeps running locally but goes silent.
                if self.connected {
                    warn!("Lost connection to server, restart the client to rejoin");
                }
                self.connected = false;
                None
            }
        }
    }

    /// Advances the local player one frame; returns a move request if it
    /// moved while connected
    pub fn update(&mut self, keys: &KeyState) -> Option<ClientPacket> {
        let moved = self.mirror.update(keys);
        (moved && self.connected).then(|| self.mirror.move_packet())
    }
}
