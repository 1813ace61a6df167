pub mod config;
pub mod patch;
pub mod render;
pub mod sync;

use anyhow::Context;
use badge_core::config::DisplayConfig;
use badge_core::presence::{JsonPresenceSource, PresenceSource};
use badge_core::store::{DEFAULT_API_URL, DEFAULT_COMMIT_MESSAGE};
use badge_core::BadgeOutput;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::Path;

/// Where the presence snapshot comes from and who it belongs to.
#[derive(Args)]
pub struct PresenceArgs {
    /// Presence snapshot JSON file, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub presence: String,

    /// GitHub user the badge links to
    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    /// Evaluate timestamps against this instant instead of the clock (RFC 3339)
    #[arg(long, env = "BADGE_NOW", hide = true)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct GithubArgs {
    /// Repository holding the README, as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: String,

    /// Token with contents write access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// README path inside the repository
    #[arg(long, default_value = "README.md")]
    pub path: String,

    /// Branch to read and commit to (default: the repository's default branch)
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Commit message
    #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
    pub message: String,
}

/// Read the display config, falling back to built-in defaults when no file
/// was found.
pub fn read_config(path: Option<&Path>) -> anyhow::Result<DisplayConfig> {
    match path {
        Some(p) => DisplayConfig::load(p)
            .with_context(|| format!("failed to load config from {}", p.display())),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(DisplayConfig::default())
        }
    }
}

/// [`read_config`] plus a hard failure on error-level findings.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DisplayConfig> {
    let config = read_config(path)?;
    config.ensure_valid().context("config validation failed")?;
    Ok(config)
}

pub fn build_badge(config: &DisplayConfig, args: &PresenceArgs) -> anyhow::Result<BadgeOutput> {
    let actor = match (&args.actor, &config.redirect_url) {
        (Some(actor), _) => actor.as_str(),
        (None, Some(_)) => "",
        (None, None) => {
            anyhow::bail!("no GitHub user to link to: pass --actor, set GITHUB_ACTOR or configure redirect_url")
        }
    };

    let source = JsonPresenceSource::from_arg(&args.presence);
    let snapshot = source
        .fetch()
        .with_context(|| format!("failed to read presence from {}", source.name()))?;
    let now = args.now.unwrap_or_else(Utc::now);

    badge_core::construct_badge(&snapshot, config, actor, now).context("failed to build badge")
}
