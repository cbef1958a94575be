//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per class.

use miette::Diagnostic;
use thiserror::Error;

use hostlink_config::ConfigError;
use hostlink_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const RATE_LIMITED: i32 = 9;
    pub const PERSISTENCE: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hostlink::validation))]
    Validation { field: String, reason: String },

    // ── Provider ─────────────────────────────────────────────────────
    #[error("Could not reach the domain provider: {reason}")]
    #[diagnostic(
        code(hostlink::provider_unavailable),
        help(
            "Nothing was changed locally; the command is safe to retry.\n\
             Check --api-url and network access, or raise --timeout."
        )
    )]
    ProviderUnavailable { reason: String },

    #[error("Provider rejected the API token: {message}")]
    #[diagnostic(
        code(hostlink::auth_failed),
        help(
            "Check the token and team scope for this profile.\n\
             Run: hostlink config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(hostlink::no_credentials),
        help(
            "Configure one with: hostlink config init\n\
             Or pass --token / set HOSTLINK_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    #[error("Rate limited by the provider")]
    #[diagnostic(
        code(hostlink::rate_limited),
        help("Retry in {retry_after_secs} seconds.")
    )]
    RateLimited { retry_after_secs: u64 },

    #[error("Not found at provider: {resource}")]
    #[diagnostic(code(hostlink::provider_not_found))]
    ProviderNotFound { resource: String },

    #[error("Provider error (HTTP {status}): {message}")]
    #[diagnostic(code(hostlink::provider_rejected))]
    ProviderRejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    // ── Attachments ──────────────────────────────────────────────────
    #[error("No domain is attached to project '{project_id}'")]
    #[diagnostic(
        code(hostlink::not_attached),
        help("Attach one first: hostlink attach {project_id} <DEPLOYMENT_URL> <DOMAIN>")
    )]
    NotAttached { project_id: String },

    #[error("Project '{project_id}' has {stored} attached, not {requested}")]
    #[diagnostic(
        code(hostlink::domain_mismatch),
        help("Run `hostlink attach` again to switch the project to {requested}.")
    )]
    DomainMismatch {
        project_id: String,
        stored: String,
        requested: String,
    },

    #[error("Domain {domain} is already attached to {claimed_by}")]
    #[diagnostic(
        code(hostlink::domain_taken),
        help("A domain can belong to only one project. Run: hostlink list")
    )]
    DomainTaken { domain: String, claimed_by: String },

    #[error("Could not persist the attachment record: {message}")]
    #[diagnostic(
        code(hostlink::persistence),
        help("Check that --database points at a writable SQLite file.")
    )]
    Persistence { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hostlink::profile_not_found),
        help("Create one with: hostlink config init")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hostlink::config))]
    Config { message: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(hostlink::prompt))]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotAttached { .. } | Self::ProviderNotFound { .. } => exit_code::NOT_FOUND,
            Self::DomainMismatch { .. } | Self::DomainTaken { .. } => exit_code::CONFLICT,
            Self::ProviderUnavailable { .. } => exit_code::CONNECTION,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Persistence { .. } => exit_code::PERSISTENCE,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Prompt(err.to_string())
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidDomainFormat { input, reason } => Self::Validation {
                field: "domain".into(),
                reason: format!("'{input}' {reason}"),
            },
            CoreError::InvalidDeploymentUrl { input, reason } => Self::Validation {
                field: "deployment URL".into(),
                reason: format!("'{input}' {reason}"),
            },
            CoreError::MissingField { field } => Self::Validation {
                field,
                reason: "is required".into(),
            },
            CoreError::ProviderUnavailable { reason } => Self::ProviderUnavailable { reason },
            CoreError::ProviderNotFound { resource } => Self::ProviderNotFound { resource },
            CoreError::ProviderUnauthorized { message } => Self::AuthFailed { message },
            CoreError::ProviderRateLimited { retry_after_secs } => {
                Self::RateLimited { retry_after_secs }
            }
            CoreError::ProviderRejected {
                status,
                code,
                message,
            } => Self::ProviderRejected {
                status,
                code,
                message,
            },
            CoreError::DuplicateDomain { domain, claimed_by } => Self::DomainTaken {
                domain,
                claimed_by: claimed_by.map_or_else(
                    || "another project".into(),
                    |project| format!("project '{project}'"),
                ),
            },
            CoreError::PersistenceFailure { message } => Self::Persistence { message },
            CoreError::NotAttached { project_id } => Self::NotAttached { project_id },
            CoreError::DomainMismatch {
                project_id,
                stored,
                requested,
            } => Self::DomainMismatch {
                project_id,
                stored,
                requested,
            },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound { name },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::InvalidDomainFormat {
                    input: "x".into(),
                    reason: "needs at least two labels".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::ProviderUnauthorized {
                    message: "bad token".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::NotAttached {
                    project_id: "p".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::DuplicateDomain {
                    domain: "example.com".into(),
                    claimed_by: Some("other".into()),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::ProviderUnavailable {
                    reason: "timeout".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ProviderRateLimited {
                    retry_after_secs: 5,
                },
                exit_code::RATE_LIMITED,
            ),
            (
                CoreError::PersistenceFailure {
                    message: "disk full".into(),
                },
                exit_code::PERSISTENCE,
            ),
        ];

        for (core, expected) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), expected, "{label}");
        }
    }

    #[test]
    fn duplicate_names_the_claiming_project() {
        let err = CliError::from(CoreError::DuplicateDomain {
            domain: "example.com".into(),
            claimed_by: Some("proj9".into()),
        });
        assert_eq!(
            err.to_string(),
            "Domain example.com is already attached to project 'proj9'"
        );
    }

    #[test]
    fn missing_credentials_is_an_auth_failure() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "work".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
