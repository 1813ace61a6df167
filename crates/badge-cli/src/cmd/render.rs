use super::{build_badge, load_config, PresenceArgs};
use crate::output::print_json;
use std::path::Path;

pub fn run(config_path: Option<&Path>, presence: &PresenceArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output = build_badge(&config, presence)?;

    if json {
        print_json(&output)?;
    } else {
        println!("{}", output.markdown);
    }
    Ok(())
}
