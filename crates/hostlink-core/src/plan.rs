// ── Required DNS planning ──
//
// Turns a classification, the provider's ownership challenges, and its
// routing recommendation into the ordered record set the customer must
// configure: TXT challenges first, then either A records or one CNAME.

use serde::{Deserialize, Serialize};

use crate::classify::DomainClass;
use crate::model::{DnsRecord, DnsRecordKind};

/// A TXT record the provider wants to see before it trusts ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipChallenge {
    /// Fully-qualified host, passed through unchanged.
    pub host: String,
    pub value: String,
}

/// The provider's preferred routing targets for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRecommendation {
    /// Apex IPv4 addresses, best first.
    pub apex_ips: Vec<String>,
    pub cname_target: Option<String>,
}

/// Compute the required record set. Deterministic: equal inputs give equal
/// output, order included.
pub fn plan(
    class: &DomainClass,
    challenges: &[OwnershipChallenge],
    routing: &RoutingRecommendation,
) -> Vec<DnsRecord> {
    let mut records: Vec<DnsRecord> = challenges
        .iter()
        .map(|c| DnsRecord::txt(&c.host, &c.value))
        .collect();

    match class {
        DomainClass::Apex => {
            records.extend(routing.apex_ips.iter().map(DnsRecord::apex_a));
        }
        DomainClass::Subdomain { label } => {
            if let Some(target) = &routing.cname_target {
                records.push(DnsRecord::cname(label, target));
            }
        }
    }

    records
}

/// TXT challenges still carried by a stored plan.
pub fn challenges_in(records: &[DnsRecord]) -> Vec<OwnershipChallenge> {
    records
        .iter()
        .filter(|r| r.kind == DnsRecordKind::Txt)
        .map(|r| OwnershipChallenge {
            host: r.host.clone(),
            value: r.value.clone(),
        })
        .collect()
}
