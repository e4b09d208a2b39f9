//! # Game Server Library
//!
//! Authoritative server for the multiplayer canvas game. It keeps the
//! canonical list of players, accepts join/move requests from clients over
//! WebSocket, and relays every change to the other connected clients.
//!
//! ## Module Organization
//!
//! ### Registry Module (`registry`)
//! The authoritative player collection and the join/move/disconnect
//! handlers. Unknown players are logged and ignored, never fatal.
//!
//! ### Channel Module (`channel`)
//! The outbound delivery contract (`emit`, `broadcast`, `emit_all`) the
//! registry talks through, so handlers never see sockets.
//!
//! ### Client Manager Module (`client_manager`)
//! Open connections, their outbound queues and the capacity limit. This is
//! the production [`channel::Channel`].
//!
//! ### Session Module (`session`)
//! The single owner of the client manager and the registry. Connection tasks
//! send it events; it processes them one at a time.
//!
//! ### Network Module (`network`)
//! TCP accept loop, per-connection WebSocket reader/writer tasks and the
//! event loop driving the session.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:8000", 32).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Known Limitations
//!
//! A connection that silently dies is only noticed when the transport
//! reports it closed; there is no heartbeat. Join and move coordinates are
//! not checked against the canvas, only for being finite. A client that
//! stops reading is dropped once its outbound queue fills.

pub mod channel;
pub mod client_manager;
pub mod network;
pub mod registry;
pub mod session;
