use super::{build_badge, load_config, GithubArgs, PresenceArgs};
use crate::output::{print_json, report_line};
use anyhow::Context;
use badge_core::store::{sync_readme, GithubReadmeStore};
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    presence: &PresenceArgs,
    github: &GithubArgs,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output = build_badge(&config, presence)?;

    let store = GithubReadmeStore::new(
        github.api_url.as_str(),
        github.repo.as_str(),
        github.path.as_str(),
        github.token.as_str(),
    )
    .with_branch(github.branch.clone());

    let report = sync_readme(
        &store,
        &output.markdown,
        &config.identifier,
        &github.message,
        dry_run,
    )
    .with_context(|| format!("failed to sync {}:{}", github.repo, github.path))?;

    if json {
        print_json(&serde_json::json!({
            "repo": github.repo,
            "path": github.path,
            "badge": output.markdown,
            "report": report,
        }))?;
    } else {
        let target = format!("{}:{}", github.repo, github.path);
        println!("{}", report_line(&target, &report, dry_run));
    }
    Ok(())
}
