use crate::error::BadgeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ActivityKind
// ---------------------------------------------------------------------------

/// Kinds of activity a user can have running at once. Declaration order is
/// the iteration order of `PresenceSnapshot::activities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    CustomActivity,
    GameActivity,
    RichPresence,
    StreamActivity,
    SpotifyActivity,
}

impl ActivityKind {
    pub fn all() -> &'static [ActivityKind] {
        &[
            ActivityKind::CustomActivity,
            ActivityKind::GameActivity,
            ActivityKind::RichPresence,
            ActivityKind::StreamActivity,
            ActivityKind::SpotifyActivity,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::CustomActivity => "CUSTOM_ACTIVITY",
            ActivityKind::GameActivity => "GAME_ACTIVITY",
            ActivityKind::RichPresence => "RICH_PRESENCE",
            ActivityKind::StreamActivity => "STREAM_ACTIVITY",
            ActivityKind::SpotifyActivity => "SPOTIFY_ACTIVITY",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BadgeError::InvalidConfig(format!("unknown activity kind '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Idle,
    #[serde(alias = "dnd")]
    DoNotDisturb,
    Offline,
}

impl Status {
    pub fn all() -> &'static [Status] {
        &[
            Status::Online,
            Status::Idle,
            Status::DoNotDisturb,
            Status::Offline,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Idle => "idle",
            Status::DoNotDisturb => "do_not_disturb",
            Status::Offline => "offline",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DisplayKind
// ---------------------------------------------------------------------------

/// Anything that owns a display string and a color in the config: either an
/// activity kind or a user status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Activity(ActivityKind),
    Status(Status),
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayKind::Activity(kind) => write!(f, "activities.{}", kind.as_str()),
            DisplayKind::Status(status) => write!(f, "statuses.{}", status.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Display preferences
// ---------------------------------------------------------------------------

/// Which sub-field of a rich presence activity is appended to the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceContext {
    Disabled,
    State,
    #[default]
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDisplay {
    Disabled,
    Hours,
    Minutes,
    Seconds,
    #[default]
    HoursMinutes,
}

impl TimeDisplay {
    pub fn is_enabled(self) -> bool {
        self != TimeDisplay::Disabled
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Epoch milliseconds.
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl Timestamps {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end.and_then(DateTime::from_timestamp_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Name,
    State,
    Details,
    LargeText,
}

impl ActivityField {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityField::Name => "name",
            ActivityField::State => "state",
            ActivityField::Details => "details",
            ActivityField::LargeText => "assets.large_text",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
}

impl Activity {
    pub fn field(&self, field: ActivityField) -> Option<&str> {
        match field {
            ActivityField::Name => self.name.as_deref(),
            ActivityField::State => self.state.as_deref(),
            ActivityField::Details => self.details.as_deref(),
            ActivityField::LargeText => self
                .assets
                .as_ref()
                .and_then(|a| a.large_text.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// PresenceSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    pub status: Status,
    #[serde(default)]
    pub activities: BTreeMap<ActivityKind, Activity>,
}

impl PresenceSnapshot {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            activities: BTreeMap::new(),
        }
    }

    pub fn with_activity(mut self, kind: ActivityKind, activity: Activity) -> Self {
        self.activities.insert(kind, activity);
        self
    }

    pub fn has_activities(&self) -> bool {
        !self.activities.is_empty()
    }
}
