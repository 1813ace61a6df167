use crate::config::DisplayConfig;
use crate::error::{BadgeError, Result};
use crate::select::Selection;
use crate::time::TimeText;
use crate::types::{
    Activity, ActivityField, ActivityKind, DisplayKind, PresenceContext, PresenceSnapshot,
};
use serde::Serialize;

/// Subject shown when the user has no activity and no static subject is set.
pub const DEFAULT_SUBJECT: &str = "Discord User";
pub const DEFAULT_SEPARATOR: &str = ", ";
/// Joins a track position onto the music suffix.
pub const PROGRESS_SEPARATOR: &str = " | ";

/// Left (subject) and right (status) text of the badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeText {
    pub subject: String,
    pub status: String,
}

/// The config entry that names the current selection: the selected activity,
/// or the user's status when nothing is selected.
pub fn display_kind(snapshot: &PresenceSnapshot, selection: Option<Selection>) -> DisplayKind {
    match selection {
        Some(sel) => DisplayKind::Activity(sel.kind),
        None => DisplayKind::Status(snapshot.status),
    }
}

/// Separator between the activity name and what follows it.
///
/// Empty for custom activities, and whenever presence context and time
/// display are both turned off.
pub fn separator(selection: Option<Selection>, config: &DisplayConfig) -> &str {
    let Some(sel) = selection else {
        return "";
    };

    let has_context = config.presence_context != PresenceContext::Disabled;
    let has_time = config.time.display.is_enabled();

    if sel.kind == ActivityKind::CustomActivity || !(has_context || has_time) {
        return "";
    }
    config.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
}

fn require(activity: &Activity, kind: ActivityKind, field: ActivityField) -> Result<&str> {
    activity.field(field).ok_or_else(|| BadgeError::MissingField {
        kind: kind.to_string(),
        field: field.as_str().to_string(),
    })
}

pub fn compose(
    snapshot: &PresenceSnapshot,
    selection: Option<Selection>,
    config: &DisplayConfig,
    time: Option<&TimeText>,
) -> Result<BadgeText> {
    let kind = display_kind(snapshot, selection);

    let subject = match (&config.static_subject, snapshot.has_activities()) {
        (Some(fixed), _) => fixed.clone(),
        (None, false) => DEFAULT_SUBJECT.to_string(),
        (None, true) => config.display(kind).to_string(),
    };

    let mut status = String::new();

    // A static subject pushes the semantic label over to the status side
    if config.static_subject.is_some() {
        status.push_str(config.display(kind));
        status.push(' ');
    }

    let Some(sel) = selection else {
        status.push_str(config.display(DisplayKind::Status(snapshot.status)));
        return Ok(BadgeText { subject, status });
    };

    let activity = snapshot
        .activities
        .get(&sel.kind)
        .ok_or_else(|| BadgeError::MissingField {
            kind: sel.kind.to_string(),
            field: "activity".to_string(),
        })?;
    let sep = separator(selection, config);

    let primary = match sel.kind {
        ActivityKind::CustomActivity => ActivityField::State,
        _ => ActivityField::Name,
    };
    status.push_str(require(activity, sel.kind, primary)?);

    if sel.kind == ActivityKind::RichPresence {
        let context = match config.presence_context {
            PresenceContext::Disabled => None,
            PresenceContext::State => Some(ActivityField::State),
            PresenceContext::Details => Some(ActivityField::Details),
        };
        if let Some(field) = context {
            status.push_str(sep);
            status.push_str(require(activity, sel.kind, field)?);
        }
    }

    if sel.kind == ActivityKind::SpotifyActivity {
        let track = require(activity, sel.kind, ActivityField::Details)?;
        let artist = require(activity, sel.kind, ActivityField::State)?;
        status.push_str(sep);
        status.push_str(&format!("{track} by {artist}"));
        if config.spotify_include_album {
            let album = require(activity, sel.kind, ActivityField::LargeText)?;
            status.push_str(&format!(" ({album})"));
        }
    } else if config.time.display.is_enabled() {
        // Time text, when there is any, goes straight after this
        status.push_str(sep);
    }

    match time {
        Some(progress @ TimeText::Progress { .. }) => {
            status.push_str(PROGRESS_SEPARATOR);
            status.push_str(&progress.to_string());
        }
        Some(TimeText::Phrase(phrase)) => status.push_str(phrase),
        None => {}
    }

    Ok(BadgeText { subject, status })
}
