use super::read_config;
use crate::output::{print_json, print_table};
use anyhow::Context;
use badge_core::config::{DisplayConfig, WarnLevel, CONFIG_FILE_NAME};
use badge_core::types::{ActivityKind, DisplayKind, Status};
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the config for common mistakes
    Validate,

    /// Show the effective display settings
    Show,

    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// `explicit` is the `--config` flag; `resolved` is what the upward search found.
pub fn run(
    explicit: Option<&Path>,
    resolved: Option<&Path>,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Validate => validate(resolved, json),
        ConfigSubcommand::Show => show(resolved, json),
        ConfigSubcommand::Init { force } => init(explicit, force, json),
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = read_config(path)?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "config": path.map(|p| p.display().to_string()),
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = read_config(path)?;

    if json {
        print_json(&config)?;
        return Ok(());
    }

    match path {
        Some(p) => println!("Config: {}", p.display()),
        None => println!("Config: (built-in defaults)"),
    }
    println!("Identifier:         {}", config.identifier);
    println!("Preferred activity: {}", config.preferred_activity);
    println!("Time display:       {:?}", config.time.display);
    println!();

    let kinds = Status::all()
        .iter()
        .map(|s| DisplayKind::Status(*s))
        .chain(ActivityKind::all().iter().map(|k| DisplayKind::Activity(*k)));
    let rows: Vec<Vec<String>> = kinds
        .map(|kind| {
            let entry = config.entry(kind);
            vec![kind.to_string(), entry.display.clone(), entry.color.clone()]
        })
        .collect();
    print_table(&["KEY", "DISPLAY", "COLOR"], &rows);

    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(explicit: Option<&Path>, force: bool, json: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()
            .context("cannot determine current directory")?
            .join(CONFIG_FILE_NAME),
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    DisplayConfig::default()
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    report_written(&path, json)
}

fn report_written(path: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({ "written": path.display().to_string() }))
    } else {
        println!("Wrote {}", path.display());
        Ok(())
    }
}
