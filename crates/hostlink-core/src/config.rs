// ── Runtime provider configuration ──
//
// Describes how to reach the domain provider. Carries the credential but
// never touches disk or process env: the CLI builds a `ProviderConfig` and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use hostlink_api::{ProviderClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_API_URL: &str = "https://api.vercel.com";
pub const DEFAULT_DEPLOYMENT_SUFFIX: &str = "vercel.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additional CA certificate (PEM), for intercepting proxies.
    CustomCa(PathBuf),
}

/// Connection settings for the provider API.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API root, e.g. `https://api.vercel.com`.
    pub api_url: Url,
    pub token: SecretString,
    /// Team scope appended to every request.
    pub team_id: Option<String>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_url: Url, token: SecretString) -> Self {
        Self {
            api_url,
            token,
            team_id: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the HTTP client these settings describe.
    pub fn connect(&self) -> Result<ProviderClient, CoreError> {
        let transport = TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
        };
        Ok(ProviderClient::new(
            self.api_url.clone(),
            &self.token,
            self.team_id.clone(),
            &transport,
        )?)
    }
}

/// Behavior knobs for `DomainAttachmentService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Domain suffix of platform-issued deployment hostnames.
    pub deployment_suffix: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            deployment_suffix: DEFAULT_DEPLOYMENT_SUFFIX.into(),
        }
    }
}
