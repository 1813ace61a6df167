//! Presence acquisition. The engine only ever sees a finished
//! [`PresenceSnapshot`]; sources decide where it comes from.

use crate::error::Result;
use crate::types::PresenceSnapshot;
use std::io::Read;
use std::path::PathBuf;

pub trait PresenceSource {
    /// Name of this source, for logging.
    fn name(&self) -> &'static str;

    fn fetch(&self) -> Result<PresenceSnapshot>;
}

/// Reads a JSON snapshot from a file, or from stdin when no path is given.
#[derive(Debug, Clone, Default)]
pub struct JsonPresenceSource {
    path: Option<PathBuf>,
}

impl JsonPresenceSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn stdin() -> Self {
        Self { path: None }
    }

    /// `-` means stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::stdin()
        } else {
            Self::from_path(arg)
        }
    }
}

impl PresenceSource for JsonPresenceSource {
    fn name(&self) -> &'static str {
        if self.path.is_some() {
            "json-file"
        } else {
            "json-stdin"
        }
    }

    fn fetch(&self) -> Result<PresenceSnapshot> {
        let data = match &self.path {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input)?;
                input
            }
        };
        let snapshot: PresenceSnapshot = serde_json::from_str(&data)?;
        tracing::info!(
            source = self.name(),
            status = %snapshot.status,
            activities = snapshot.activities.len(),
            "presence loaded"
        );
        Ok(snapshot)
    }
}

/// Hands back a snapshot that is already in memory.
#[derive(Debug, Clone)]
pub struct StaticPresenceSource(pub PresenceSnapshot);

impl PresenceSource for StaticPresenceSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self) -> Result<PresenceSnapshot> {
        Ok(self.0.clone())
    }
}
