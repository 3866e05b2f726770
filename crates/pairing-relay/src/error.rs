use std::net::SocketAddr;

use tokio_tungstenite::tungstenite;

/// Process-level failures of the relay server.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("websocket handshake with {peer} failed: {source}")]
    Handshake {
        peer: SocketAddr,
        #[source]
        source: tungstenite::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single outbox send that did not go through.
///
/// Relay and notification sends produce these and discard them on purpose:
/// delivery to a peer is best-effort and never affects the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outbox full")]
    Full,

    #[error("channel closed")]
    Closed,

    #[error("unknown channel")]
    UnknownChannel,
}
