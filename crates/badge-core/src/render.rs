use crate::color::{self, ColorPair};
use crate::compose::{self, BadgeText};
use crate::config::DisplayConfig;
use crate::error::{BadgeError, Result};
use crate::select::select;
use crate::time;
use crate::types::{ActivityKind, PresenceSnapshot};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;

pub const BADGE_BASE_URL: &str = "https://badgen.net/badge/";
pub const BADGE_ICON: &str = "discord";
pub const REDIRECT_BASE_URL: &str = "https://github.com/";

/// Characters left as-is in a badge path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Markdown image-in-link that carries the badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBadge {
    pub identifier: String,
    pub image_url: String,
    pub redirect_url: String,
}

impl RenderedBadge {
    pub fn markdown(&self) -> String {
        format!(
            "[![{}]({})]({})",
            self.identifier, self.image_url, self.redirect_url
        )
    }
}

impl fmt::Display for RenderedBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown())
    }
}

/// Everything one render pass derived, for logging and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeOutput {
    pub selected: Option<ActivityKind>,
    pub used_preferred: bool,
    pub text: BadgeText,
    pub colors: ColorPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub badge: RenderedBadge,
    pub markdown: String,
}

fn encode_segment(part: &'static str, value: &str) -> Result<String> {
    if value.is_empty() || value.chars().any(char::is_control) {
        return Err(BadgeError::Serialization {
            part,
            value: value.to_string(),
        });
    }
    Ok(utf8_percent_encode(value, SEGMENT).to_string())
}

/// Redirect target for clicks on the badge: the configured path, or the
/// actor's profile repository.
pub fn redirect_url(config: &DisplayConfig, actor: &str) -> String {
    match config.redirect_url.as_deref() {
        Some(path) if !path.is_empty() => {
            format!("{REDIRECT_BASE_URL}{}", path.trim_start_matches('/'))
        }
        _ => format!("{REDIRECT_BASE_URL}{actor}/{actor}"),
    }
}

pub fn render(
    text: &BadgeText,
    colors: &ColorPair,
    redirect_url: &str,
    identifier: &str,
) -> Result<RenderedBadge> {
    let subject = encode_segment("subject", &text.subject)?;
    let status = encode_segment("status", &text.status)?;
    let image_url = format!(
        "{BADGE_BASE_URL}{subject}/{status}?color={}&labelColor={}&icon={BADGE_ICON}",
        colors.subject_color, colors.status_color
    );

    Ok(RenderedBadge {
        identifier: identifier.to_string(),
        image_url,
        redirect_url: redirect_url.to_string(),
    })
}

/// Run the whole derivation: select, time, compose, color, render.
pub fn construct_badge(
    snapshot: &PresenceSnapshot,
    config: &DisplayConfig,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<BadgeOutput> {
    let selection = select(&snapshot.activities, config.preferred_activity);
    match selection {
        Some(sel) if sel.used_preferred => {
            tracing::info!(activity = %sel.kind, "preferred activity found")
        }
        Some(sel) => tracing::info!(
            preferred = %config.preferred_activity,
            activity = %sel.kind,
            "preferred activity not running, using another"
        ),
        None => tracing::warn!(status = %snapshot.status, "no activity detected"),
    }

    let time_text = selection.and_then(|sel| {
        let timestamps = snapshot.activities.get(&sel.kind)?.timestamps?;
        time::format(&timestamps, now, sel.kind, &config.time)
    });

    let text = compose::compose(snapshot, selection, config, time_text.as_ref())?;
    tracing::debug!(subject = %text.subject, status = %text.status, "badge text");

    let colors = color::resolve(snapshot, selection, config)?;
    let redirect = redirect_url(config, actor);
    let badge = render(&text, &colors, &redirect, &config.identifier)?;
    let markdown = badge.markdown();
    tracing::info!(badge = %markdown, "badge constructed");

    Ok(BadgeOutput {
        selected: selection.map(|sel| sel.kind),
        used_preferred: selection.is_some_and(|sel| sel.used_preferred),
        text,
        colors,
        time: time_text.map(|t| t.to_string()),
        badge,
        markdown,
    })
}
