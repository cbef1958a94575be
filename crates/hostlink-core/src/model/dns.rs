// ── DNS record types ──

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// TTL for every record the customer is asked to create.
pub const REQUIRED_TTL: u32 = 60;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DnsRecordKind {
    Txt,
    A,
    Cname,
}

/// One DNS record the customer must configure.
///
/// Two records are the same record when kind, host and value match; the TTL
/// is advisory and not part of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub kind: DnsRecordKind,
    /// Host the record lives at: `@` for the apex, a label, or an FQDN.
    pub host: String,
    pub value: String,
    pub ttl: u32,
}

impl DnsRecord {
    pub fn new(kind: DnsRecordKind, host: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
            value: value.into(),
            ttl: REQUIRED_TTL,
        }
    }

    pub fn txt(host: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(DnsRecordKind::Txt, host, value)
    }

    /// An `A` record at the zone apex.
    pub fn apex_a(ip: impl Into<String>) -> Self {
        Self::new(DnsRecordKind::A, "@", ip)
    }

    pub fn cname(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(DnsRecordKind::Cname, label, target)
    }
}

impl PartialEq for DnsRecord {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.host == other.host && self.value == other.value
    }
}

impl Eq for DnsRecord {}

impl Hash for DnsRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.host.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} (ttl {})", self.kind, self.host, self.value, self.ttl)
    }
}

/// Routing records the provider currently observes for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedRecords {
    pub a_values: Vec<String>,
    pub cnames: Vec<String>,
}

impl ObservedRecords {
    pub fn is_empty(&self) -> bool {
        self.a_values.is_empty() && self.cnames.is_empty()
    }
}
