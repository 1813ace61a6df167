use super::{build_badge, load_config, PresenceArgs};
use crate::output::{print_json, report_line};
use anyhow::Context;
use badge_core::store::{sync_readme, LocalReadmeStore};
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    presence: &PresenceArgs,
    readme: &Path,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output = build_badge(&config, presence)?;

    let store = LocalReadmeStore::new(readme);
    let report = sync_readme(&store, &output.markdown, &config.identifier, "", dry_run)
        .with_context(|| format!("failed to patch {}", readme.display()))?;

    if json {
        print_json(&serde_json::json!({
            "readme": readme.display().to_string(),
            "badge": output.markdown,
            "report": report,
        }))?;
    } else {
        println!("{}", report_line(&readme.display().to_string(), &report, dry_run));
    }
    Ok(())
}
