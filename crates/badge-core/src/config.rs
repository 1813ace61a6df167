use crate::color::normalize_hex;
use crate::error::{BadgeError, Result};
use crate::readme::is_valid_identifier;
use crate::types::{ActivityKind, DisplayKind, PresenceContext, Status, TimeDisplay};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "presence-badge.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DisplayEntry
// ---------------------------------------------------------------------------

/// Text and color shown for one activity kind or status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub display: String,
    /// Hex color, with or without a leading `#`.
    pub color: String,
}

impl DisplayEntry {
    fn new(display: &str, color: &str) -> Self {
        Self {
            display: display.to_string(),
            color: color.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusDisplays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDisplays {
    #[serde(default = "default_online")]
    pub online: DisplayEntry,
    #[serde(default = "default_idle")]
    pub idle: DisplayEntry,
    #[serde(default = "default_do_not_disturb")]
    pub do_not_disturb: DisplayEntry,
    #[serde(default = "default_offline")]
    pub offline: DisplayEntry,
}

fn default_online() -> DisplayEntry {
    DisplayEntry::new("Online", "#43B581")
}

fn default_idle() -> DisplayEntry {
    DisplayEntry::new("Idle", "#FAA61A")
}

fn default_do_not_disturb() -> DisplayEntry {
    DisplayEntry::new("Do Not Disturb", "#F04747")
}

fn default_offline() -> DisplayEntry {
    DisplayEntry::new("Offline", "#747F8D")
}

impl Default for StatusDisplays {
    fn default() -> Self {
        Self {
            online: default_online(),
            idle: default_idle(),
            do_not_disturb: default_do_not_disturb(),
            offline: default_offline(),
        }
    }
}

impl StatusDisplays {
    pub fn get(&self, status: Status) -> &DisplayEntry {
        match status {
            Status::Online => &self.online,
            Status::Idle => &self.idle,
            Status::DoNotDisturb => &self.do_not_disturb,
            Status::Offline => &self.offline,
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityDisplays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDisplays {
    #[serde(default = "default_custom_activity")]
    pub custom_activity: DisplayEntry,
    #[serde(default = "default_game_activity")]
    pub game_activity: DisplayEntry,
    #[serde(default = "default_rich_presence")]
    pub rich_presence: DisplayEntry,
    #[serde(default = "default_stream_activity")]
    pub stream_activity: DisplayEntry,
    #[serde(default = "default_spotify_activity")]
    pub spotify_activity: DisplayEntry,
}

fn default_custom_activity() -> DisplayEntry {
    DisplayEntry::new("Custom Status", "#7289DA")
}

fn default_game_activity() -> DisplayEntry {
    DisplayEntry::new("Playing", "#5865F2")
}

fn default_rich_presence() -> DisplayEntry {
    DisplayEntry::new("Rich Presence", "#4F545C")
}

fn default_stream_activity() -> DisplayEntry {
    DisplayEntry::new("Streaming", "#593695")
}

fn default_spotify_activity() -> DisplayEntry {
    DisplayEntry::new("Listening to Spotify", "#1DB954")
}

impl Default for ActivityDisplays {
    fn default() -> Self {
        Self {
            custom_activity: default_custom_activity(),
            game_activity: default_game_activity(),
            rich_presence: default_rich_presence(),
            stream_activity: default_stream_activity(),
            spotify_activity: default_spotify_activity(),
        }
    }
}

impl ActivityDisplays {
    pub fn get(&self, kind: ActivityKind) -> &DisplayEntry {
        match kind {
            ActivityKind::CustomActivity => &self.custom_activity,
            ActivityKind::GameActivity => &self.game_activity,
            ActivityKind::RichPresence => &self.rich_presence,
            ActivityKind::StreamActivity => &self.stream_activity,
            ActivityKind::SpotifyActivity => &self.spotify_activity,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default)]
    pub display: TimeDisplay,
    #[serde(default)]
    pub shorthand: bool,
    #[serde(default = "default_elapsed_override")]
    pub elapsed_override: String,
    #[serde(default = "default_remaining_override")]
    pub remaining_override: String,
}

fn default_elapsed_override() -> String {
    "elapsed.".to_string()
}

fn default_remaining_override() -> String {
    "remaining.".to_string()
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            display: TimeDisplay::default(),
            shorthand: false,
            elapsed_override: default_elapsed_override(),
            remaining_override: default_remaining_override(),
        }
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Name that tags the rendered badge and finds it again in the README.
    #[serde(default = "default_identifier")]
    pub identifier: String,
    #[serde(default)]
    pub statuses: StatusDisplays,
    #[serde(default)]
    pub activities: ActivityDisplays,
    #[serde(default = "default_preferred_activity")]
    pub preferred_activity: ActivityKind,
    #[serde(default)]
    pub presence_context: PresenceContext,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default)]
    pub shift_colors: bool,
    #[serde(default)]
    pub spotify_include_album: bool,
    /// Path under the redirect domain; defaults to `{actor}/{actor}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

fn default_version() -> u32 {
    1
}

fn default_identifier() -> String {
    "Discord Presence".to_string()
}

fn default_preferred_activity() -> ActivityKind {
    ActivityKind::RichPresence
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            identifier: default_identifier(),
            statuses: StatusDisplays::default(),
            activities: ActivityDisplays::default(),
            preferred_activity: default_preferred_activity(),
            presence_context: PresenceContext::default(),
            time: TimeConfig::default(),
            static_subject: None,
            separator: None,
            shift_colors: false,
            spotify_include_album: false,
            redirect_url: None,
        }
    }
}

impl DisplayConfig {
    pub fn entry(&self, kind: DisplayKind) -> &DisplayEntry {
        match kind {
            DisplayKind::Activity(kind) => self.activities.get(kind),
            DisplayKind::Status(status) => self.statuses.get(status),
        }
    }

    pub fn display(&self, kind: DisplayKind) -> &str {
        &self.entry(kind).display
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BadgeError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: DisplayConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn entries(&self) -> Vec<(DisplayKind, &DisplayEntry)> {
        let statuses = Status::all()
            .iter()
            .map(|s| DisplayKind::Status(*s));
        let activities = ActivityKind::all()
            .iter()
            .map(|k| DisplayKind::Activity(*k));
        statuses
            .chain(activities)
            .map(|kind| (kind, self.entry(kind)))
            .collect()
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Every color must resolve to six hex digits
        for (kind, entry) in self.entries() {
            if normalize_hex(&entry.color).is_none() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "color '{}' for {} is not a 6-digit hex color",
                        entry.color, kind
                    ),
                });
            }
            if entry.display.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("display string for {} is empty", kind),
                });
            }
        }

        // 2. The identifier must be findable again in the README
        if !is_valid_identifier(&self.identifier) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "identifier '{}' must be 1-6 words of [A-Za-z0-9_()-] separated by single spaces",
                    self.identifier
                ),
            });
        }

        // The patcher's redirect group stops at whitespace and ')'
        if let Some(path) = self.redirect_url.as_deref() {
            if path.chars().any(|c| c.is_whitespace() || c == ')') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "redirect_url '{path}' must not contain whitespace or ')'; the badge could not be found again in the README"
                    ),
                });
            }
        }

        // 3. Empty overrides produce odd-looking badges
        if matches!(self.static_subject.as_deref(), Some(s) if s.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "static_subject is set but empty".to_string(),
            });
        }
        if self.separator.as_deref() == Some("") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "separator is set but empty; context will run into the activity name"
                    .to_string(),
            });
        }
        if self.time.display.is_enabled() {
            for (name, value) in [
                ("time.elapsed_override", &self.time.elapsed_override),
                ("time.remaining_override", &self.time.remaining_override),
            ] {
                if value.trim().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!("{name} is empty"),
                    });
                }
            }
        }

        warnings
    }

    /// Fails with the first error-level finding from [`DisplayConfig::validate`].
    pub fn ensure_valid(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(BadgeError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = DisplayConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: DisplayConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn optional_fields_not_serialized_when_unset() {
        let yaml = serde_yaml::to_string(&DisplayConfig::default()).unwrap();
        assert!(!yaml.contains("static_subject"));
        assert!(!yaml.contains("separator"));
        assert!(!yaml.contains("redirect_url"));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
identifier: My Badge
preferred_activity: SPOTIFY_ACTIVITY
statuses:
  online:
    display: Around
    color: "00FF00"
time:
  display: minutes
  shorthand: true
"#;
        let cfg: DisplayConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.identifier, "My Badge");
        assert_eq!(cfg.preferred_activity, ActivityKind::SpotifyActivity);
        assert_eq!(cfg.statuses.online.display, "Around");
        assert_eq!(cfg.statuses.idle, default_idle());
        assert_eq!(cfg.time.display, TimeDisplay::Minutes);
        assert!(cfg.time.shorthand);
        assert_eq!(cfg.time.elapsed_override, "elapsed.");
        assert_eq!(cfg.presence_context, PresenceContext::Details);
    }

    #[test]
    fn entry_lookup_is_direct() {
        let cfg = DisplayConfig::default();
        assert_eq!(
            cfg.display(DisplayKind::Status(Status::DoNotDisturb)),
            "Do Not Disturb"
        );
        assert_eq!(
            cfg.entry(DisplayKind::Activity(ActivityKind::SpotifyActivity))
                .color,
            "#1DB954"
        );
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut cfg = DisplayConfig::default();
        cfg.static_subject = Some("Me".to_string());
        cfg.save(&path).unwrap();
        let loaded = DisplayConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = DisplayConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, BadgeError::ConfigNotFound(_)));
    }

    #[test]
    fn validate_default_config_no_warnings() {
        assert!(DisplayConfig::default().validate().is_empty());
        DisplayConfig::default().ensure_valid().unwrap();
    }

    #[test]
    fn validate_bad_color_is_error() {
        let mut cfg = DisplayConfig::default();
        cfg.activities.game_activity.color = "#12345".to_string();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error
                && w.message.contains("#12345")
                && w.message.contains("activities.GAME_ACTIVITY")
        }));
        let err = cfg.ensure_valid().unwrap_err();
        assert!(matches!(err, BadgeError::InvalidConfig(_)));
    }

    #[test]
    fn validate_bad_identifier_is_error() {
        let mut cfg = DisplayConfig::default();
        cfg.identifier = "one two three four five six seven".to_string();
        assert!(cfg
            .validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("identifier")));
    }

    #[test]
    fn validate_empty_separator_is_warning() {
        let mut cfg = DisplayConfig::default();
        cfg.separator = Some(String::new());
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        cfg.ensure_valid().unwrap();
    }

    #[test]
    fn validate_unmatchable_redirect_is_error() {
        let mut cfg = DisplayConfig::default();
        cfg.redirect_url = Some("octocat/my repo".to_string());
        assert!(cfg
            .validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("redirect_url")));
        assert!(matches!(cfg.ensure_valid(), Err(BadgeError::InvalidConfig(_))));

        cfg.redirect_url = Some("octocat/dotfiles)".to_string());
        assert!(cfg.ensure_valid().is_err());

        cfg.redirect_url = Some("octocat/dotfiles".to_string());
        cfg.ensure_valid().unwrap();
    }
}
