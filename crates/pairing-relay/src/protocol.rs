//! Relay-level wire protocol. Only the readiness signal is interpreted;
//! everything else is forwarded between the paired peers as opaque text.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// `type` tag of the readiness signal a client sends to request a slot.
pub const READY_TYPE: &str = "ReadyToConnectMessage";

/// How the coordinator treats one inbound text payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// The readiness signal.
    Ready,
    /// Anything else, relayed verbatim.
    Opaque,
}

/// Classify a raw payload. Text that is not a JSON object, or whose `type`
/// is missing or not the readiness tag, is opaque.
pub fn classify(raw: &str) -> Inbound {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) if value.get("type").and_then(|t| t.as_str()) == Some(READY_TYPE) => {
            Inbound::Ready
        }
        Ok(_) => Inbound::Opaque,
        Err(e) => {
            tracing::debug!(error = %e, "Payload is not valid JSON, relaying as opaque");
            Inbound::Opaque
        }
    }
}

/// Messages the relay itself sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RelayResponse {
    /// Sent to both peers once both slots are occupied.
    RoleMessage { role: Role },

    /// Sent to a channel whose readiness signal found both slots taken.
    SessionFullMessage,
}

impl RelayResponse {
    pub fn to_json(&self) -> String {
        // Unit and string-only variants; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
