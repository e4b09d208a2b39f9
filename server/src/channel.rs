//! Outbound half of the connection channel contract
//!
//! The registry never touches sockets. It talks to connected clients through
//! this trait, which the client manager implements over per-connection
//! WebSocket queues and tests implement by recording every delivery.

use shared::{PlayerId, ServerPacket};

/// Delivery of named events to connected clients
pub trait Channel {
    /// Sends an event to one connection
    fn emit(&self, to: PlayerId, packet: &ServerPacket);

    /// Sends an event to every connection except `from`
    fn broadcast(&self, from: PlayerId, packet: &ServerPacket);

    /// Sends an event to every connection
    fn emit_all(&self, packet: &ServerPacket);
}
