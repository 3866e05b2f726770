//! pairing-relay: WebSocket signaling relay for bootstrapping a WebRTC session.
//!
//! Pairs exactly two clients: the first to send `{"type":"ReadyToConnectMessage"}`
//! becomes the initiator, the second the responder, and both are told their role
//! with a `RoleMessage`. After that every other message from one peer is forwarded
//! verbatim to the other. The relay never inspects offers, answers or ICE
//! candidates and keeps no state across restarts.

pub mod config;
pub mod connection;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;

pub use config::Config;
pub use coordinator::{Coordinator, Dispatch, SessionSnapshot};
pub use error::{DeliveryError, RelayError};
pub use session::{ChannelId, Role};
