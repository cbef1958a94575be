// hostlink-api: Async Rust client for the domain provider API

pub mod client;
pub mod deployments;
pub mod domains;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ProviderClient;
pub use error::Error;
pub use models::{
    AliasResponse, Deployment, DomainConfig, ExpectedRecord, ProjectDomain, RecommendedCname,
    RecommendedIpv4, VerificationChallenge, VerifyResponse,
};
pub use transport::{TlsMode, TransportConfig};
