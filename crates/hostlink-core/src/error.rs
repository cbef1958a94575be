// ── Core error types ──
//
// Domain-level failures surfaced by hostlink-core. Consumers never see HTTP
// status codes or SQL errors directly: `From<hostlink_api::Error>` and
// `From<StoreError>` translate the lower layers into this taxonomy.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid domain '{input}': {reason}")]
    InvalidDomainFormat { input: String, reason: String },

    #[error("Invalid deployment URL '{input}': {reason}")]
    InvalidDeploymentUrl { input: String, reason: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    // ── Provider errors ──────────────────────────────────────────────
    #[error("Domain provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("Not found at provider: {resource}")]
    ProviderNotFound { resource: String },

    #[error("Provider rejected credentials: {message}")]
    ProviderUnauthorized { message: String },

    #[error("Rate limited by provider -- retry after {retry_after_secs}s")]
    ProviderRateLimited { retry_after_secs: u64 },

    #[error("Provider rejected the request (HTTP {status}): {message}")]
    ProviderRejected {
        status: u16,
        /// Provider error code, e.g. `domain_already_in_use`.
        code: Option<String>,
        message: String,
    },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Domain {domain} is already attached to {}", .claimed_by.as_deref().unwrap_or("another project"))]
    DuplicateDomain {
        domain: String,
        claimed_by: Option<String>,
    },

    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    // ── State errors ─────────────────────────────────────────────────
    #[error("No domain is attached to project {project_id}")]
    NotAttached { project_id: String },

    #[error("Project {project_id} has {stored} attached, not {requested}")]
    DomainMismatch {
        project_id: String,
        stored: String,
        requested: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the failure aborts the request regardless of input.
    ///
    /// Provider outages and store failures are fatal; everything else is a
    /// property of the request or of current provider state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::PersistenceFailure { .. }
        )
    }

    pub(crate) fn invalid_domain(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDomainFormat {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_owned(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hostlink_api::Error> for CoreError {
    fn from(err: hostlink_api::Error) -> Self {
        use hostlink_api::Error as Api;

        match err {
            Api::Transport(ref e) => {
                if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::ProviderNotFound {
                        resource: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::ProviderUnavailable {
                        reason: e.to_string(),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid provider URL: {e}"),
            },
            Api::Timeout { timeout_secs } => CoreError::ProviderUnavailable {
                reason: format!("request timed out after {timeout_secs}s"),
            },
            Api::Client(message) => CoreError::Config { message },
            Api::Unauthorized { message } => CoreError::ProviderUnauthorized { message },
            Api::NotFound { message } => CoreError::ProviderNotFound { resource: message },
            Api::RateLimited { retry_after_secs } => {
                CoreError::ProviderRateLimited { retry_after_secs }
            }
            Api::Server { status, message } => CoreError::ProviderUnavailable {
                reason: format!("HTTP {status}: {message}"),
            },
            Api::Api {
                status,
                code,
                message,
            } => CoreError::ProviderRejected {
                status,
                code,
                message,
            },
            Api::Deserialization { message, body: _ } => CoreError::ProviderUnavailable {
                reason: format!("unexpected response: {message}"),
            },
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateDomain { domain, claimed_by } => {
                CoreError::DuplicateDomain { domain, claimed_by }
            }
            other => CoreError::PersistenceFailure {
                message: other.to_string(),
            },
        }
    }
}
