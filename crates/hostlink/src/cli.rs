//! Clap derive structures for the `hostlink` CLI.
//!
//! Also compiled by `build.rs` for man page generation, so this module may
//! only depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hostlink -- attach custom domains to hosted deployments
#[derive(Debug, Parser)]
#[command(
    name = "hostlink",
    version,
    about = "Attach custom domains to hosted deployments and track DNS verification",
    long_about = "Registers custom domains with the hosting provider, tells you which DNS\n\
        records to create, and keeps a local record of ownership and routing\n\
        verification per project.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "HOSTLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Provider API root (overrides profile)
    #[arg(long, env = "HOSTLINK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Provider API token
    #[arg(long, env = "HOSTLINK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Team scope for provider requests
    #[arg(long, env = "HOSTLINK_TEAM_ID", global = true)]
    pub team_id: Option<String>,

    /// SQLite database holding attachment records
    #[arg(long, short = 'd', env = "HOSTLINK_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color` from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile and `defaults.timeout`)
    #[arg(long, env = "HOSTLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a custom domain for a project and print the DNS to create
    #[command(alias = "add")]
    Attach(AttachArgs),

    /// Re-check ownership and routing for an attached domain
    #[command(alias = "check")]
    Verify(VerifyArgs),

    /// Show the stored attachment for a project
    Get(GetArgs),

    /// List every stored attachment
    #[command(alias = "ls")]
    List,

    /// Point an attached domain at a specific deployment
    Alias(AliasArgs),

    /// Classify a domain as apex or subdomain (offline)
    Classify(ClassifyArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOMAINS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// Project identifier used as the record key
    pub project_id: String,

    /// Platform deployment URL (e.g. https://app-x1.vercel.app)
    pub deployment_url: String,

    /// Custom domain to attach
    pub domain: String,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Project identifier
    pub project_id: String,

    /// Custom domain previously attached to the project
    pub domain: String,

    /// Recompute and store the required DNS records
    #[arg(long)]
    pub replan: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Project identifier
    pub project_id: String,
}

#[derive(Debug, Args)]
pub struct AliasArgs {
    /// Project identifier
    pub project_id: String,

    /// Deployment to point the domain at
    pub deployment_url: String,

    /// Custom domain to alias
    pub domain: String,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Domain to classify
    pub domain: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
