//! Profile resolution with CLI flag overrides.
//!
//! Loads the active profile from `hostlink-config`, layers `--api-url`,
//! `--team-id`, `--database`, `--timeout` and `--token` on top, fills unset
//! presentation flags from `[defaults]`, and builds the pieces the service
//! needs: a provider handle and an open SQLite store.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::debug;

use hostlink_config::{Config, Defaults, Profile};
use hostlink_core::{DomainAttachmentService, ProviderConfig, SqliteStore};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

impl GlobalOpts {
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

/// Fill `--output` and `--color` from the config's `[defaults]` when the
/// flags were not given.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Config {
        message: format!("{field}: {reason}"),
    })
}

/// The profile in effect for this invocation, flags applied.
#[derive(Debug, Clone)]
pub struct ActiveProfile {
    pub name: String,
    pub profile: Profile,
    /// `defaults.timeout`, used when neither the flag nor the profile sets one.
    pub default_timeout: u64,
}

/// Pick the profile named by `--profile` (or the config default) and apply
/// flag overrides.
///
/// An explicitly requested profile must exist. Without one, a missing
/// default profile falls back to built-in defaults so flags and env vars
/// alone are enough to run.
pub fn active_profile(global: &GlobalOpts, cfg: &Config) -> Result<ActiveProfile, CliError> {
    let name = cfg.profile_name(global.profile.as_deref()).to_owned();
    let mut profile = match cfg.profile(&name) {
        Ok(profile) => profile.clone(),
        Err(err) if global.profile.is_some() => return Err(err.into()),
        Err(_) => Profile::default(),
    };

    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.team_id.is_some() {
        profile.team_id.clone_from(&global.team_id);
    }
    if global.database.is_some() {
        profile.database.clone_from(&global.database);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    debug!(profile = %name, api_url = %profile.api_url, "resolved profile");
    Ok(ActiveProfile {
        name,
        profile,
        default_timeout: cfg.defaults.timeout,
    })
}

/// Provider settings for the active profile. `--token` beats every stored
/// credential source.
pub fn provider_config(global: &GlobalOpts, active: &ActiveProfile) -> Result<ProviderConfig, CliError> {
    let token = match &global.token {
        Some(token) => SecretString::from(token.clone()),
        None => hostlink_config::resolve_token(&active.profile, &active.name)?,
    };
    Ok(hostlink_config::provider_config(
        &active.profile,
        token,
        active.default_timeout,
    )?)
}

pub fn open_store(path: &Path) -> Result<Arc<SqliteStore>, CliError> {
    debug!(path = %path.display(), "opening attachment database");
    SqliteStore::open(path).map(Arc::new).map_err(|e| CliError::Persistence {
        message: format!("{}: {e}", path.display()),
    })
}

/// A service backed by the profile's database and provider credentials.
pub fn connected_service(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<DomainAttachmentService, CliError> {
    let active = active_profile(global, cfg)?;
    let client = provider_config(global, &active)?.connect()?;
    let store = open_store(&active.profile.database_path())?;

    Ok(DomainAttachmentService::new(Arc::new(client), store)
        .with_options(active.profile.service_options()))
}

/// A service that can only read stored records; no credentials needed.
pub fn offline_service(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<DomainAttachmentService, CliError> {
    let active = active_profile(global, cfg)?;
    let store = open_store(&active.profile.database_path())?;

    Ok(DomainAttachmentService::read_only(store).with_options(active.profile.service_options()))
}
