//! Pairing & relay coordinator: assigns roles and forwards messages between the pair.
//!
//! All session and registry state lives behind one lock, so two channels can
//! never both observe an empty slot and claim it. Sends to outboxes are
//! `try_send` on bounded channels and never wait while the lock is held.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::error::DeliveryError;
use crate::protocol::{classify, Inbound, RelayResponse};
use crate::session::{ChannelId, ReadyOutcome, Role, Session};

/// Longest payload prefix included in relay debug logs.
const PREVIEW_CHARS: usize = 100;

/// What the coordinator did with one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Readiness signal took a slot; still waiting for a peer.
    Assigned(Role),
    /// Readiness signal filled the second slot; both sides were notified.
    Paired(Role),
    /// Readiness signal from a channel that already holds a slot.
    AlreadyAssigned(Role),
    /// Readiness signal while both slots belong to other channels.
    SessionFull,
    /// Opaque message handed to the peer's outbox.
    Relayed,
    /// Opaque message from a slot holder with no peer yet, dropped.
    NoPeer,
    /// Opaque message from a channel that holds no slot, dropped.
    Unpaired,
    /// Peer exists but its outbox refused the message.
    DeliveryFailed(DeliveryError),
}

/// Read-only view of the pairing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub initiator: Option<ChannelId>,
    pub responder: Option<ChannelId>,
    /// Every registered channel, including those without a slot.
    pub connected: usize,
}

struct Inner {
    next_id: u64,
    outboxes: HashMap<ChannelId, mpsc::Sender<String>>,
    session: Session,
}

impl Inner {
    fn deliver(&self, to: ChannelId, text: String) -> Result<(), DeliveryError> {
        let outbox = self.outboxes.get(&to).ok_or(DeliveryError::UnknownChannel)?;
        outbox.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn notify(&self, to: ChannelId, response: &RelayResponse) {
        if let Err(e) = self.deliver(to, response.to_json()) {
            debug!(channel = %to, error = %e, "Notification not delivered");
        }
    }
}

/// Shared handle to the coordinator. Clones refer to the same session.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<RwLock<Inner>>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                outboxes: HashMap::new(),
                session: Session::new(),
            })),
        }
    }

    /// Register a newly connected channel. No role is assigned yet.
    ///
    /// Everything the coordinator sends to this channel is pushed to `outbox`.
    pub async fn connect(&self, outbox: mpsc::Sender<String>) -> ChannelId {
        let mut inner = self.inner.write().await;
        let id = ChannelId(inner.next_id);
        inner.next_id += 1;
        inner.outboxes.insert(id, outbox);
        id
    }

    /// Handle one text payload received from `from`.
    pub async fn handle_message(&self, from: ChannelId, raw: &str) -> Dispatch {
        match classify(raw) {
            Inbound::Ready => self.ready(from).await,
            Inbound::Opaque => self.relay(from, raw).await,
        }
    }

    async fn ready(&self, from: ChannelId) -> Dispatch {
        let mut inner = self.inner.write().await;
        if !inner.outboxes.contains_key(&from) {
            // Already disconnected.
            return Dispatch::Unpaired;
        }

        match inner.session.ready(from) {
            ReadyOutcome::Assigned { role, paired: false } => {
                info!(channel = %from, role = %role, "Slot assigned, waiting for peer");
                Dispatch::Assigned(role)
            }
            ReadyOutcome::Assigned { role, paired: true } => {
                let (Some(initiator), Some(responder)) =
                    (inner.session.initiator(), inner.session.responder())
                else {
                    return Dispatch::Assigned(role);
                };
                inner.notify(initiator, &RelayResponse::RoleMessage { role: Role::Initiator });
                inner.notify(responder, &RelayResponse::RoleMessage { role: Role::Responder });
                info!(%initiator, %responder, "Session paired");
                Dispatch::Paired(role)
            }
            ReadyOutcome::AlreadyAssigned(role) => {
                debug!(channel = %from, role = %role, "Repeated readiness signal ignored");
                Dispatch::AlreadyAssigned(role)
            }
            ReadyOutcome::Full => {
                warn!(channel = %from, "Both slots taken, readiness signal refused");
                inner.notify(from, &RelayResponse::SessionFullMessage);
                Dispatch::SessionFull
            }
        }
    }

    async fn relay(&self, from: ChannelId, raw: &str) -> Dispatch {
        let inner = self.inner.read().await;

        let Some(role) = inner.session.role_of(from) else {
            debug!(channel = %from, "Message from channel without a slot dropped");
            return Dispatch::Unpaired;
        };
        let Some(peer) = inner.session.peer_of(from) else {
            debug!(channel = %from, role = %role, "No peer yet, message dropped");
            return Dispatch::NoPeer;
        };

        debug!(
            from = %role,
            preview = %raw.chars().take(PREVIEW_CHARS).collect::<String>(),
            "Relaying message"
        );

        // Best-effort: the sender never learns about a failed delivery.
        match inner.deliver(peer, raw.to_owned()) {
            Ok(()) => Dispatch::Relayed,
            Err(e) => {
                debug!(channel = %peer, error = %e, "Relay delivery suppressed");
                Dispatch::DeliveryFailed(e)
            }
        }
    }

    /// Forget `id` and free any slot it held. The remaining peer is not told.
    pub async fn disconnect(&self, id: ChannelId) -> Option<Role> {
        let mut inner = self.inner.write().await;
        inner.outboxes.remove(&id);
        let role = inner.session.vacate(id);
        if let Some(role) = role {
            info!(channel = %id, role = %role, "Slot cleared");
        }
        role
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read().await;
        SessionSnapshot {
            initiator: inner.session.initiator(),
            responder: inner.session.responder(),
            connected: inner.outboxes.len(),
        }
    }
}
