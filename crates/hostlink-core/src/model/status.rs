// ── Verification status ──

use serde::Serialize;
use strum::Display;

/// Ownership and routing flags plus the derived fully-verified flag.
///
/// Fields are private so `fully_verified` can only ever be the AND of the
/// other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    ownership_verified: bool,
    routing_verified: bool,
    fully_verified: bool,
}

impl VerificationStatus {
    pub fn new(ownership_verified: bool, routing_verified: bool) -> Self {
        Self {
            ownership_verified,
            routing_verified,
            fully_verified: ownership_verified && routing_verified,
        }
    }

    pub fn ownership_verified(&self) -> bool {
        self.ownership_verified
    }

    pub fn routing_verified(&self) -> bool {
        self.routing_verified
    }

    pub fn fully_verified(&self) -> bool {
        self.fully_verified
    }

    /// Replace the ownership flag, keeping routing as it was.
    #[must_use]
    pub fn with_ownership(self, ownership_verified: bool) -> Self {
        Self::new(ownership_verified, self.routing_verified)
    }

    pub fn state(&self) -> AttachmentState {
        match (self.ownership_verified, self.routing_verified) {
            (false, _) => AttachmentState::PendingOwnership,
            (true, false) => AttachmentState::PendingRouting,
            (true, true) => AttachmentState::Verified,
        }
    }
}

/// Where an attachment stands. Derived from stored flags, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttachmentState {
    /// No record for the project.
    Unregistered,
    PendingOwnership,
    PendingRouting,
    Verified,
}

impl AttachmentState {
    pub fn of(status: Option<&VerificationStatus>) -> Self {
        status.map_or(Self::Unregistered, VerificationStatus::state)
    }
}
