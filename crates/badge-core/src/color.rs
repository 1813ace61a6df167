use crate::compose::display_kind;
use crate::config::DisplayConfig;
use crate::error::{BadgeError, Result};
use crate::select::Selection;
use crate::types::{DisplayKind, PresenceSnapshot};
use serde::Serialize;

/// Label color used when there is no activity and no static subject.
pub const NO_ACTIVITY_COLOR: &str = "2F3136";

/// Badge colors as bare 6-digit hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    /// Right half of the badge (`color=` in the URL).
    pub subject_color: String,
    /// Left half of the badge (`labelColor=` in the URL).
    pub status_color: String,
}

impl ColorPair {
    pub fn swapped(self) -> Self {
        Self {
            subject_color: self.status_color,
            status_color: self.subject_color,
        }
    }
}

/// Strip an optional leading `#` and check for exactly six hex digits.
pub fn normalize_hex(color: &str) -> Option<String> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hex.to_string())
    } else {
        None
    }
}

fn configured_color(config: &DisplayConfig, kind: DisplayKind) -> Result<String> {
    let value = &config.entry(kind).color;
    normalize_hex(value).ok_or_else(|| BadgeError::InvalidColor {
        key: kind.to_string(),
        value: value.clone(),
    })
}

pub fn resolve(
    snapshot: &PresenceSnapshot,
    selection: Option<Selection>,
    config: &DisplayConfig,
) -> Result<ColorPair> {
    let has_static = config.static_subject.is_some();
    let kind = display_kind(snapshot, selection);

    let status_color = if selection.is_some() || has_static {
        configured_color(config, kind)?
    } else {
        NO_ACTIVITY_COLOR.to_string()
    };

    let subject_color = if snapshot.has_activities() || !has_static {
        configured_color(config, DisplayKind::Status(snapshot.status))?
    } else {
        configured_color(config, kind)?
    };

    let pair = ColorPair {
        subject_color,
        status_color,
    };
    tracing::debug!(
        subject = %pair.subject_color,
        status = %pair.status_color,
        shifted = config.shift_colors,
        "resolved badge colors"
    );

    Ok(if config.shift_colors { pair.swapped() } else { pair })
}
