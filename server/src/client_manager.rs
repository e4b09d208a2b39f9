//! Connected-client bookkeeping for the multiplayer server
//!
//! This module tracks every open WebSocket connection, including:
//! - Connection lifecycle (register on handshake, remove on close)
//! - Per-connection outbound queues feeding each socket's writer task
//! - Client capacity management and address tracking
//!
//! The client manager is the server's implementation of [`Channel`]: it
//! encodes each event once and pushes the resulting text frame onto the
//! queue of every addressed connection.
//!
//! Queues are bounded. A connection whose queue is full has stopped reading;
//! it is marked as lagging and the session drops it after the current event.

use crate::channel::Channel;
use log::{debug, error, info, warn};
use shared::{PlayerId, ServerPacket};
use std::cell::RefCell;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_tungstenite::tungstenite::Message;

/// Frames a connection may have queued before it is dropped
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Sending half of a connection's outbound queue
pub type ClientSender = mpsc::Sender<Message>;

/// Result of queueing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Queued,
    /// The queue is full; the peer is not keeping up
    Full,
    /// The writer task is gone, which only happens during teardown
    Closed,
}

/// Represents one open connection
///
/// A connection exists here from the moment its WebSocket handshake completes,
/// whether or not it has joined the game yet.
#[derive(Debug)]
pub struct Client {
    /// Connection identifier, reused as the player id once the client joins
    pub id: PlayerId,
    /// Remote address, for logging
    pub addr: SocketAddr,
    /// When the handshake completed
    pub connected_at: Instant,
    /// Frames queued here are written to the socket in order
    sender: ClientSender,
}

impl Client {
    /// Creates a new client record for a freshly accepted connection
    pub fn new(id: PlayerId, addr: SocketAddr, sender: ClientSender) -> Self {
        Self {
            id,
            addr,
            connected_at: Instant::now(),
            sender,
        }
    }

    /// Queues a text frame for this connection without waiting
    pub fn send_text(&self, text: &str) -> SendStatus {
        match self.sender.try_send(Message::Text(text.to_owned().into())) {
            Ok(()) => SendStatus::Queued,
            Err(TrySendError::Full(_)) => SendStatus::Full,
            Err(TrySendError::Closed(_)) => SendStatus::Closed,
        }
    }
}

/// Manages all open connections and fans events out to them
///
/// Owned exclusively by the server's event loop, so no locking is needed.
pub struct ClientManager {
    /// Open connections indexed by their id
    clients: HashMap<PlayerId, Client>,
    /// Maximum number of concurrent connections allowed
    max_clients: usize,
    /// Connections whose queue overflowed since the last `take_lagging`
    lagging: RefCell<Vec<PlayerId>>,
}

impl ClientManager {
    /// Creates an empty client manager with the specified capacity limit
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            max_clients,
            lagging: RefCell::new(Vec::new()),
        }
    }

    /// Registers a newly accepted connection
    ///
    /// Returns false if the server is at capacity or the id is already in
    /// use; the caller drops the sender, which closes the socket.
    pub fn add_client(&mut self, id: PlayerId, addr: SocketAddr, sender: ClientSender) -> bool {
        if self.is_full() {
            info!("Rejecting connection {} from {}: server full", id, addr);
            return false;
        }

        if self.clients.contains_key(&id) {
            error!("Connection id {} is already in use", id);
            return false;
        }

        info!("Client {} connected from {}", id, addr);
        self.clients.insert(id, Client::new(id, addr, sender));
        true
    }

    /// Removes a connection
    ///
    /// Dropping the record drops its sender, which ends the writer task.
    /// Returns true if the connection was known.
    pub fn remove_client(&mut self, id: PlayerId) -> bool {
        if let Some(client) = self.clients.remove(&id) {
            info!(
                "Client {} disconnected after {:.1}s",
                client.id,
                client.connected_at.elapsed().as_secs_f32()
            );
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Ids of all open connections
    pub fn client_ids(&self) -> Vec<PlayerId> {
        self.clients.keys().copied().collect()
    }

    /// Returns the number of open connections
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no clients are currently connected
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.max_clients
    }

    /// Drains the connections that could not keep up with their queue
    pub fn take_lagging(&self) -> Vec<PlayerId> {
        let mut lagging = self.lagging.take();
        lagging.sort_unstable();
        lagging.dedup();
        lagging
    }

    fn encode(packet: &ServerPacket) -> Option<String> {
        match packet.encode() {
            Ok(text) => Some(text),
            Err(e) => {
                error!("Dropping outbound event: {}", e);
                None
            }
        }
    }

    fn deliver(&self, client: &Client, text: &str) {
        match client.send_text(text) {
            SendStatus::Queued => {}
            SendStatus::Full => {
                warn!("Client {} is not reading, queue full", client.id);
                self.lagging.borrow_mut().push(client.id);
            }
            SendStatus::Closed => debug!("Client {} queue closed, dropping frame", client.id),
        }
    }
}

impl Channel for ClientManager {
    fn emit(&self, to: PlayerId, packet: &ServerPacket) {
        let Some(client) = self.clients.get(&to) else {
            debug!("No open connection {} for {:?}", to, packet);
            return;
        };

        if let Some(text) = Self::encode(packet) {
            self.deliver(client, &text);
        }
    }

    fn broadcast(&self, from: PlayerId, packet: &ServerPacket) {
        let Some(text) = Self::encode(packet) else {
            return;
        };

        for client in self.clients.values().filter(|client| client.id != from) {
            self.deliver(client, &text);
        }
    }

    fn emit_all(&self, packet: &ServerPacket) {
        let Some(text) = Self::encode(packet) else {
            return;
        };

        for client in self.clients.values() {
            self.deliver(client, &text);
        }
    }
}
