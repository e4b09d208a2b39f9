//! Client network layer
//!
//! The connection runs on its own thread with a private tokio runtime, since
//! macroquad owns the main thread. The game loop talks to it through two
//! unbounded channels: packets out, [`NetworkEvent`]s in.

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientPacket, ProtocolError, ServerPacket};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the connection reports back to the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Connected,
    Packet(ServerPacket),
    Disconnected,
}

/// Game-loop side of the network thread
pub struct NetworkHandle {
    outgoing: mpsc::UnboundedSender<ClientPacket>,
    events: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl NetworkHandle {
    pub fn send(&self, packet: ClientPacket) {
        if self.outgoing.send(packet).is_err() {
            debug!("Connection closed, dropping outgoing packet");
        }
    }

    /// Next pending event, without blocking
    pub fn try_recv(&mut self) -> Option<NetworkEvent> {
        self.events.try_recv().ok()
    }
}

/// Starts the connection on a background thread
///
/// The returned handle always ends up seeing exactly one
/// [`NetworkEvent::Disconnected`], whether the connection failed or closed.
/// There is no reconnection.
pub fn spawn_network_thread(url: String) -> Result<NetworkHandle, ClientError> {
    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("network".to_owned())
        .spawn(move || {
            if let Err(e) = runtime.block_on(run_connection(&url, outgoing_rx, events_tx.clone())) {
                error!("Connection to {} failed: {}", url, e);
            }
            let _ = events_tx.send(NetworkEvent::Disconnected);
        })?;

    Ok(NetworkHandle {
        outgoing: outgoing_tx,
        events: events_rx,
    })
}

/// Connects to `url` and shuttles packets both ways until either side closes
///
/// Sends [`NetworkEvent::Connected`] once the handshake succeeds. Malformed
/// frames from the server are logged and skipped.
pub async fn run_connection(
    url: &str,
    mut outgoing: mpsc::UnboundedReceiver<ClientPacket>,
    events: mpsc::UnboundedSender<NetworkEvent>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("Connected to socket server");

    let (mut write, mut read) = ws_stream.split();
    let _ = events.send(NetworkEvent::Connected);

    loop {
        tokio::select! {
            packet = outgoing.recv() => match packet {
                Some(packet) => {
                    let text = packet.encode()?;
                    write.send(Message::Text(text.into())).await?;
                }
                None => {
                    let _ = write.close().await;
                    break;
                }
            },
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => match ServerPacket::decode(text.as_str()) {
                    Ok(packet) => {
                        let _ = events.send(NetworkEvent::Packet(packet));
                    }
                    Err(e) => warn!("Rejected frame from server: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
        }
    }

    info!("Disconnected from socket server");
    Ok(())
}
