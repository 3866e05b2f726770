//! Per-connection handler: register, then pump frames both ways until the socket ends.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::coordinator::Coordinator;

/// Drive one WebSocket client for its whole lifetime.
///
/// The client's slot, if any, is released exactly once when the loop ends,
/// whatever the cause.
pub async fn handle_connection<S>(
    ws: WebSocketStream<S>,
    addr: SocketAddr,
    coordinator: Coordinator,
    outbox_capacity: usize,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = ws.split();

    let (tx, mut rx) = mpsc::channel::<String>(outbox_capacity);
    let id = coordinator.connect(tx).await;

    tracing::info!(peer = %addr, channel = %id, "Client connected");

    loop {
        tokio::select! {
            // Outbox → this client's socket
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // This client's socket → coordinator
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let dispatch = coordinator.handle_message(id, text.as_str()).await;
                        tracing::trace!(channel = %id, ?dispatch, "Message handled");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!(channel = %id, "Binary frame ignored");
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    let role = coordinator.disconnect(id).await;
    tracing::info!(peer = %addr, channel = %id, role = ?role, "Client disconnected");
}
