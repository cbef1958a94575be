// ── Persisted attachment record ──

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;

use super::dns::DnsRecord;
use super::status::{AttachmentState, VerificationStatus};

/// One project's custom-domain attachment, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub project_id: String,
    /// Provider-side project name derived from the deployment URL.
    pub project_name: String,
    pub deployment_url: String,
    pub custom_domain: String,
    /// Latest plan. Replaced wholesale, never merged.
    pub required_dns: Vec<DnsRecord>,
    #[serde(flatten)]
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    pub fn state(&self) -> AttachmentState {
        self.status.state()
    }

    /// Records still to be configured; `None` once fully verified.
    pub fn pending_dns(&self) -> Option<&[DnsRecord]> {
        (!self.status.fully_verified()).then_some(self.required_dns.as_slice())
    }
}

/// Read view of a stored record.
///
/// The required records are only shown while there is still something to
/// configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainView {
    pub project_id: String,
    pub project_name: String,
    pub deployment_url: String,
    pub custom_domain: String,
    #[serde(flatten)]
    pub status: VerificationStatus,
    pub state: AttachmentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_dns: Option<Vec<DnsRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DomainRecord> for DomainView {
    fn from(record: DomainRecord) -> Self {
        let required_dns = record.pending_dns().map(<[DnsRecord]>::to_vec);
        Self {
            state: record.state(),
            project_id: record.project_id,
            project_name: record.project_name,
            deployment_url: record.deployment_url,
            custom_domain: record.custom_domain,
            status: record.status,
            required_dns,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Verification-only mutation applied by `DomainStore::update_verification`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationUpdate {
    pub ownership_verified: bool,
    /// `None` leaves the stored routing flag untouched.
    pub routing_verified: Option<bool>,
    /// `Some` replaces the stored plan.
    pub required_dns: Option<Vec<DnsRecord>>,
    pub updated_at: DateTime<Utc>,
}

/// Current time at the microsecond resolution the stores keep.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// `updated_at` for a write landing after `previous`: strictly later, even
/// inside one clock tick.
pub(crate) fn next_updated_at(previous: DateTime<Utc>, candidate: DateTime<Utc>) -> DateTime<Utc> {
    if candidate > previous {
        candidate
    } else {
        previous + Duration::microseconds(1)
    }
}
