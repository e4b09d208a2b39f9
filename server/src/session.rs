//! Server session: the single owner of all mutable game state
//!
//! Connection tasks never touch the registry directly. They turn socket
//! activity into [`ServerMessage`]s, and the event loop feeds those to the
//! session one at a time, so every handler runs to completion before the
//! next event is looked at.

use crate::client_manager::{ClientManager, ClientSender};
use crate::registry::PlayerRegistry;
use log::{debug, warn};
use shared::{ClientPacket, PlayerId};
use std::net::SocketAddr;

/// Events sent from connection tasks to the event loop
#[derive(Debug)]
pub enum ServerMessage {
    Connected {
        client_id: PlayerId,
        addr: SocketAddr,
        sender: ClientSender,
    },
    PacketReceived {
        client_id: PlayerId,
        packet: ClientPacket,
    },
    Disconnected {
        client_id: PlayerId,
    },
}

pub struct Session {
    clients: ClientManager,
    registry: PlayerRegistry,
}

impl Session {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: ClientManager::new(max_clients),
            registry: PlayerRegistry::new(),
        }
    }

    pub fn handle_message(&mut self, message: ServerMessage) {
        self.dispatch(message);
        self.drop_lagging();
    }

    fn dispatch(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Connected {
                client_id,
                addr,
                sender,
            } => {
                // A refused connection's sender is dropped here, closing it.
                if self.clients.add_client(client_id, addr, sender) {
                    self.registry.on_connect(client_id, addr);
                }
            }
            ServerMessage::PacketReceived { client_id, packet } => {
                if !self.clients.contains(client_id) {
                    debug!("Ignoring event from refused connection {}", client_id);
                    return;
                }
                self.registry.handle_packet(&self.clients, client_id, packet);
            }
            ServerMessage::Disconnected { client_id } => {
                if !self.clients.remove_client(client_id) {
                    debug!("Ignoring close of refused connection {}", client_id);
                    return;
                }
                self.registry.on_disconnect(&self.clients, client_id);
            }
        }
    }

    /// Disconnects every client whose outbound queue overflowed. The removal
    /// broadcasts can overflow further queues, so this runs until none are left.
    fn drop_lagging(&mut self) {
        loop {
            let lagging = self.clients.take_lagging();
            if lagging.is_empty() {
                break;
            }

            for client_id in lagging {
                if self.clients.remove_client(client_id) {
                    warn!("Dropping client {}: outbound queue full", client_id);
                    self.registry.on_disconnect(&self.clients, client_id);
                }
            }
        }
    }

    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }
}
