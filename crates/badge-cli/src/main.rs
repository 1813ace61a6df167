mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, GithubArgs, PresenceArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "presence-badge",
    about = "Render your chat presence as a README badge and keep it up to date",
    version,
    propagate_version = true
)]
struct Cli {
    /// Display config file (default: search upward for presence-badge.yaml)
    #[arg(long, global = true, env = "BADGE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the badge markdown for a presence snapshot
    Render {
        #[command(flatten)]
        presence: PresenceArgs,
    },

    /// Put the badge into a local README file
    Patch {
        #[command(flatten)]
        presence: PresenceArgs,

        /// README file to update
        #[arg(long, default_value = "README.md")]
        readme: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Put the badge into a README on GitHub and commit it if it changed
    Sync {
        #[command(flatten)]
        presence: PresenceArgs,

        #[command(flatten)]
        github: GithubArgs,

        /// Report what would change without committing
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect and validate the display config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Sync { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = root::resolve_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Render { presence } => {
            cmd::render::run(config_path.as_deref(), &presence, cli.json)
        }
        Commands::Patch {
            presence,
            readme,
            dry_run,
        } => cmd::patch::run(config_path.as_deref(), &presence, &readme, dry_run, cli.json),
        Commands::Sync {
            presence,
            github,
            dry_run,
        } => cmd::sync::run(config_path.as_deref(), &presence, &github, dry_run, cli.json),
        Commands::Config { subcommand } => {
            cmd::config::run(cli.config.as_deref(), config_path.as_deref(), subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
