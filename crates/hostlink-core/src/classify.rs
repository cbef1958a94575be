// ── Domain classification ──
//
// Label counting only. No public-suffix list: `example.co.uk` has three
// labels and is treated as a subdomain.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{DnsRecordKind, Hostname};

/// Apex or subdomain. Derived from the hostname, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DomainClass {
    /// Exactly two labels, e.g. `example.com`.
    Apex,
    /// More than two labels; `label` is the leftmost one.
    Subdomain { label: String },
}

impl DomainClass {
    pub fn is_apex(&self) -> bool {
        matches!(self, Self::Apex)
    }

    /// The record type that routes traffic for this class.
    pub fn routing_kind(&self) -> DnsRecordKind {
        match self {
            Self::Apex => DnsRecordKind::A,
            Self::Subdomain { .. } => DnsRecordKind::Cname,
        }
    }
}

impl fmt::Display for DomainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apex => f.write_str("apex"),
            Self::Subdomain { label } => write!(f, "subdomain ({label})"),
        }
    }
}

pub fn classify(hostname: &Hostname) -> Result<DomainClass, CoreError> {
    let mut labels = hostname.labels();
    let first = labels.next().unwrap_or_default();

    match labels.count() + 1 {
        ..=1 => Err(CoreError::invalid_domain(
            hostname.as_str(),
            "needs at least two labels",
        )),
        2 => Ok(DomainClass::Apex),
        _ => Ok(DomainClass::Subdomain {
            label: first.to_owned(),
        }),
    }
}
