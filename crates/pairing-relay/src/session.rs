//! Two-slot pairing state: which channel is the initiator and which is the responder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for one connected channel. Equality is handle equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch-{}", self.0)
    }
}

/// Role a paired channel plays in the WebRTC negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates the offer.
    Initiator,
    /// Answers it.
    Responder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Initiator => "initiator",
            Role::Responder => "responder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a readiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// The channel took a free slot. `paired` is true when this filled the
    /// second slot, i.e. role notifications are now due.
    Assigned { role: Role, paired: bool },
    /// The channel already holds a slot; nothing changed.
    AlreadyAssigned(Role),
    /// Both slots belong to other channels.
    Full,
}

/// The process-wide pairing session. Never holds the same channel twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    initiator: Option<ChannelId>,
    responder: Option<ChannelId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initiator(&self) -> Option<ChannelId> {
        self.initiator
    }

    pub fn responder(&self) -> Option<ChannelId> {
        self.responder
    }

    pub fn is_paired(&self) -> bool {
        self.initiator.is_some() && self.responder.is_some()
    }

    /// Number of occupied slots (0, 1 or 2).
    pub fn occupied(&self) -> usize {
        usize::from(self.initiator.is_some()) + usize::from(self.responder.is_some())
    }

    pub fn role_of(&self, id: ChannelId) -> Option<Role> {
        if self.initiator == Some(id) {
            Some(Role::Initiator)
        } else if self.responder == Some(id) {
            Some(Role::Responder)
        } else {
            None
        }
    }

    /// The occupant of the other slot, if `id` holds one and the other is filled.
    pub fn peer_of(&self, id: ChannelId) -> Option<ChannelId> {
        match self.role_of(id)? {
            Role::Initiator => self.responder,
            Role::Responder => self.initiator,
        }
    }

    /// Apply a readiness signal from `id`.
    ///
    /// The initiator slot is filled first. A channel already holding a slot
    /// never takes the second one.
    pub fn ready(&mut self, id: ChannelId) -> ReadyOutcome {
        if let Some(role) = self.role_of(id) {
            return ReadyOutcome::AlreadyAssigned(role);
        }

        let role = if self.initiator.is_none() {
            self.initiator = Some(id);
            Role::Initiator
        } else if self.responder.is_none() {
            self.responder = Some(id);
            Role::Responder
        } else {
            return ReadyOutcome::Full;
        };

        ReadyOutcome::Assigned {
            role,
            paired: self.is_paired(),
        }
    }

    /// Clear whichever slot `id` holds. Returns the role it gave up.
    pub fn vacate(&mut self, id: ChannelId) -> Option<Role> {
        let role = self.role_of(id)?;
        match role {
            Role::Initiator => self.initiator = None,
            Role::Responder => self.responder = None,
        }
        Some(role)
    }
}
