//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use hostlink_config::{Config, Profile};
use hostlink_core::config::{DEFAULT_API_URL, DEFAULT_DEPLOYMENT_SUFFIX};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),
        ConfigCommand::Show => show(global),
        ConfigCommand::SetToken { profile } => set_token(profile.as_deref(), global),
    }
}

fn prompt_token() -> Result<SecretString, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(CliError::prompt)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "API token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token.to_owned()))
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = hostlink_config::config_path();
    eprintln!("hostlink configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = hostlink_config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(CliError::prompt)?;

    let api_url: String = Input::new()
        .with_prompt("Provider API URL")
        .default(DEFAULT_API_URL.into())
        .interact_text()
        .map_err(CliError::prompt)?;
    hostlink_config::parse_api_url(&api_url)?;

    let team_id: String = Input::new()
        .with_prompt("Team ID (leave empty for a personal account)")
        .allow_empty(true)
        .interact_text()
        .map_err(CliError::prompt)?;

    let deployment_suffix: String = Input::new()
        .with_prompt("Deployment hostname suffix")
        .default(DEFAULT_DEPLOYMENT_SUFFIX.into())
        .interact_text()
        .map_err(CliError::prompt)?;

    let token = prompt_token()?;
    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the API token?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(CliError::prompt)?;

    let plaintext = if store_selection == 0 {
        hostlink_config::store_token(&profile_name, &token)?;
        eprintln!("   Token stored in system keyring");
        None
    } else {
        Some(token.expose_secret().to_owned())
    };

    let profile = Profile {
        api_url,
        team_id: Some(team_id.trim().to_owned()).filter(|t| !t.is_empty()),
        token: plaintext,
        deployment_suffix,
        ..Profile::default()
    };
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    hostlink_config::save_config_to(&config_path, &cfg)?;

    eprintln!("\nConfiguration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Next: hostlink attach <PROJECT_ID> <DEPLOYMENT_URL> <DOMAIN>");
    Ok(())
}

// ── Show ────────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = redacted(&hostlink_config::load_config()?);
    let path = hostlink_config::config_path();

    let rendered = output::render_single(
        global.output(),
        &cfg,
        |c| {
            let body = toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}"));
            format!("# {}\n{body}", path.display())
        },
        |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Set token ───────────────────────────────────────────────────────

fn set_token(profile: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = hostlink_config::load_config_or_default();
    let name = profile
        .or(global.profile.as_deref())
        .unwrap_or_else(|| cfg.profile_name(None))
        .to_owned();

    let token = prompt_token()?;
    hostlink_config::store_token(&name, &token)?;

    if !global.quiet {
        eprintln!("Token stored in system keyring for profile '{name}'");
    }
    Ok(())
}
