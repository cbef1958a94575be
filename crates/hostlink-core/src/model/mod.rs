// Domain model: hostnames, DNS records, verification status, stored records.

pub mod dns;
pub mod hostname;
pub mod record;
pub mod status;

pub use dns::{DnsRecord, DnsRecordKind, ObservedRecords, REQUIRED_TTL};
pub use hostname::{DeploymentHost, Hostname};
pub use record::{DomainRecord, DomainView, VerificationUpdate};
pub use status::{AttachmentState, VerificationStatus};
