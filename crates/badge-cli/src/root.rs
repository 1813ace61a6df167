use badge_core::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

/// Resolve the display config file.
///
/// Priority:
/// 1. `--config` flag / `BADGE_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `presence-badge.yaml`
/// 3. Walk upward from `cwd` looking for `.github/presence-badge.yaml`
/// 4. `None`: built-in defaults
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, Path::new(CONFIG_FILE_NAME))
        .or_else(|| find_upward(&cwd, &Path::new(".github").join(CONFIG_FILE_NAME)))
}

fn find_upward(start: &Path, relative: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(relative);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
