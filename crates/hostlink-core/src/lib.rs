// hostlink-core: Domain attachment and verification reconciliation.
//
// Pure steps (classify, plan, reduce) sit beside two seams: `DomainProvider`
// for the hosting provider and `DomainStore` for persistence.
// `DomainAttachmentService` wires them together.

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod plan;
pub mod provider;
pub mod reduce;
pub mod request;
pub mod service;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{DomainClass, classify};
pub use config::{ProviderConfig, ServiceOptions, TlsVerification};
pub use error::CoreError;
pub use model::{
    AttachmentState, DeploymentHost, DnsRecord, DnsRecordKind, DomainRecord, DomainView,
    Hostname, ObservedRecords, VerificationStatus, VerificationUpdate,
};
pub use plan::{OwnershipChallenge, RoutingRecommendation, plan};
pub use provider::{DnsConfig, DomainProvider, OwnershipResult, Registration};
pub use reduce::{OwnershipCheck, RoutingCheck, reduce};
pub use request::{AliasRequest, AttachRequest, VerifyRequest};
pub use service::{AliasOutcome, AttachOutcome, DomainAttachmentService, VerifyOutcome};
pub use store::{DomainStore, MemoryStore, SqliteStore, StoreError};
