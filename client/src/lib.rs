//! # Game Client Library
//!
//! Client side of the multiplayer canvas game: it moves the local player from
//! the keyboard, reports every move to the server, and mirrors the other
//! players from the server's broadcasts.
//!
//! ## Module Organization
//!
//! ### Mirror Module (`mirror`)
//! The local player plus a cache of remote players keyed by id. The cache is
//! only ever changed by server events; unknown ids are logged and ignored.
//!
//! ### Game Module (`game`)
//! The connection-aware state machine around the mirror: join on connect,
//! send a move whenever the local player actually moved, go quiet on
//! disconnect.
//!
//! ### Input Module (`input`)
//! Samples key press and release edges each frame into held direction flags.
//!
//! ### Network Module (`network`)
//! The WebSocket connection, run on its own thread and exposed to the frame
//! loop as a pair of channels.
//!
//! ### Rendering Module (`rendering`)
//! Draws every player as a square on the macroquad window, with a small
//! status line.
//!
//! ## Frame Loop
//!
//! ```rust,no_run
//! use client::{game::ClientGame, input::InputSampler, network, rendering::Renderer};
//! use shared::Player;
//!
//! # async fn run() -> Result<(), client::network::ClientError> {
//! let mut game = ClientGame::new(Player::new(100.0, 100.0));
//! let mut network = network::spawn_network_thread("ws://127.0.0.1:8000".to_owned())?;
//! let mut input = InputSampler::new();
//! let mut renderer = Renderer::new();
//!
//! loop {
//!     // Apply everything the server sent since the last frame
//!     while let Some(event) = network.try_recv() {
//!         if let Some(packet) = game.handle_event(event) {
//!             network.send(packet);
//!         }
//!     }
//!
//!     // Move the local player and report the move
//!     if let Some(packet) = game.update(&input.sample()) {
//!         network.send(packet);
//!     }
//!
//!     renderer.render(&game);
//!     macroquad::window::next_frame().await;
//! }
//! # }
//! ```
//!
//! ## Known Limitations
//!
//! There is no reconnection. Once the connection drops the local player can
//! still move, but nothing is sent until the client is restarted.

pub mod game;
pub mod input;
pub mod mirror;
pub mod network;
pub mod rendering;
