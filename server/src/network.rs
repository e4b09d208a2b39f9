//! Server network layer: WebSocket transport and the event loop

use crate::client_manager::OUTBOUND_QUEUE_CAPACITY;
use crate::session::{ServerMessage, Session};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientPacket, PlayerId};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Game server: a bound listener plus the session it feeds
pub struct Server {
    listener: TcpListener,
    session: Session,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Server {
    pub async fn bind(addr: &str, max_clients: usize) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            session: Session::new(max_clients),
            server_tx,
            server_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections and processes their events until the future is
    /// dropped. Dropping it drops the session, which closes every connection.
    pub async fn run(self) {
        let Server {
            listener,
            mut session,
            server_tx,
            mut server_rx,
        } = self;

        tokio::spawn(accept_connections(listener, server_tx));
        info!("Server started successfully");

        while let Some(message) = server_rx.recv().await {
            session.handle_message(message);
        }

        info!("Server shutting down");
    }
}

/// Hands out connection ids in increasing order, never reusing one
#[derive(Debug)]
struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next: Some(1) }
    }

    /// None once every id has been handed out
    fn allocate(&mut self) -> Option<PlayerId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(PlayerId(id))
    }
}

/// Accepts TCP connections and hands each its own task and connection id
async fn accept_connections(listener: TcpListener, server_tx: mpsc::UnboundedSender<ServerMessage>) {
    let mut ids = IdAllocator::new();

    while !server_tx.is_closed() {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let Some(client_id) = ids.allocate() else {
                    error!("Connection ids exhausted, no longer accepting connections");
                    break;
                };
                tokio::spawn(handle_connection(stream, addr, client_id, server_tx.clone()));
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Runs one connection: handshake, a writer task draining the outbound
/// queue, and a reader loop forwarding decoded events to the event loop.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    client_id: PlayerId,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    let (sender, mut outbound) = mpsc::channel::<Message>(OUTBOUND_QUEUE_CAPACITY);

    if server_tx
        .send(ServerMessage::Connected {
            client_id,
            addr,
            sender,
        })
        .is_err()
    {
        return;
    }

    // Ends once the session drops this connection's sender.
    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Err(e) = write.send(message).await {
                debug!("Write to client {} failed: {}", client_id, e);
                break;
            }
        }
        let _ = write.close().await;
    });

    while let Some(result) = read.next().await {
        match result {
            Ok(Message::Text(text)) => match ClientPacket::decode(text.as_str()) {
                Ok(packet) => {
                    if server_tx
                        .send(ServerMessage::PacketReceived { client_id, packet })
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => warn!("Rejected frame from client {}: {}", client_id, e),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Read from client {} failed: {}", client_id, e);
                break;
            }
        }
    }

    let _ = server_tx.send(ServerMessage::Disconnected { client_id });
}
