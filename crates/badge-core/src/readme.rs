use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Identifier grammar: 1-6 words of `[A-Za-z0-9_()-]` joined by single spaces.
const IDENTIFIER: &str = r"[A-Za-z0-9_()-]+(?: [A-Za-z0-9_()-]+){0,5}";

static BADGE_RE: OnceLock<Regex> = OnceLock::new();
static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();

fn badge_re() -> &'static Regex {
    BADGE_RE.get_or_init(|| {
        Regex::new(&format!(
            r"\[!\[(?P<identifier>{IDENTIFIER})\]\((?P<image_url>https://badgen\.net/badge/[^/\s)]+/[^?\s)]+\?[^\s)]*)\)\]\((?P<redirect_url>[^\s)]+)\)"
        ))
        .unwrap()
    })
}

fn identifier_re() -> &'static Regex {
    IDENTIFIER_RE.get_or_init(|| Regex::new(&format!("^{IDENTIFIER}$")).unwrap())
}

pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier_re().is_match(identifier)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// An existing badge with the same identifier was overwritten in place.
    Replaced,
    /// No badge with the identifier was found; the new one went on top.
    Prepended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub text: String,
    pub changed: bool,
    pub outcome: PatchOutcome,
}

/// Put `badge` into `current`, replacing the first badge in the document if
/// it carries `identifier`, otherwise prepending it followed by a blank line.
///
/// Only the first structural match is looked at. A README whose first badge
/// has another identifier gets a second badge on every run.
pub fn patch(current: &str, badge: &str, identifier: &str) -> Patch {
    let found = badge_re().captures(current);

    let (text, outcome) = match found {
        Some(caps) if &caps["identifier"] == identifier => {
            let span = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            tracing::info!(identifier, "badge found, substituting the old badge");
            let mut text = String::with_capacity(current.len() + badge.len());
            text.push_str(&current[..span.start]);
            text.push_str(badge);
            text.push_str(&current[span.end..]);
            (text, PatchOutcome::Replaced)
        }
        other => {
            if let Some(caps) = other {
                tracing::debug!(found = &caps["identifier"], "first badge has another identifier");
            }
            tracing::info!(
                identifier,
                "badge not found, adding it to the top of the README"
            );
            (format!("{badge}\n\n{current}"), PatchOutcome::Prepended)
        }
    };

    let changed = text.as_bytes() != current.as_bytes();
    Patch {
        text,
        changed,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADGE: &str = "[![Discord Presence](https://badgen.net/badge/Playing/Factorio?color=43B581&labelColor=5865F2&icon=discord)](https://github.com/me/me)";
    const NEWER: &str = "[![Discord Presence](https://badgen.net/badge/Discord%20User/Idle?color=FAA61A&labelColor=2F3136&icon=discord)](https://github.com/me/me)";

    #[test]
    fn prepends_when_no_badge() {
        let result = patch("# Hello\n", BADGE, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Prepended);
        assert!(result.changed);
        assert_eq!(result.text, format!("{BADGE}\n\n# Hello\n"));
    }

    #[test]
    fn replaces_matching_badge_in_place() {
        let readme = format!("# Hi\n\nText {BADGE} more\n");
        let result = patch(&readme, NEWER, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Replaced);
        assert!(result.changed);
        assert_eq!(result.text, format!("# Hi\n\nText {NEWER} more\n"));
    }

    #[test]
    fn same_badge_is_unchanged() {
        let readme = format!("{BADGE}\n\n# Hi\n");
        let result = patch(&readme, BADGE, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Replaced);
        assert!(!result.changed);
        assert_eq!(result.text, readme);
    }

    #[test]
    fn repatching_replaces_instead_of_duplicating() {
        let first = patch("# Hello\n", BADGE, "Discord Presence");
        let second = patch(&first.text, NEWER, "Discord Presence");
        assert_eq!(second.outcome, PatchOutcome::Replaced);
        assert_eq!(second.text, format!("{NEWER}\n\n# Hello\n"));
        assert_eq!(second.text.matches("badgen.net").count(), 1);
    }

    #[test]
    fn other_identifier_prepends() {
        let readme = BADGE.replace("Discord Presence", "Other Badge");
        let result = patch(&readme, NEWER, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Prepended);
        assert!(result.text.ends_with(&readme));
    }

    #[test]
    fn only_first_match_is_considered() {
        let other = BADGE.replace("Discord Presence", "Other Badge");
        let readme = format!("{other}\n{BADGE}\n");
        let result = patch(&readme, NEWER, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Prepended);
        assert!(result.text.contains(BADGE));
    }

    #[test]
    fn non_badgen_images_are_ignored() {
        let readme = "[![Discord Presence](https://img.shields.io/badge/a-b-c)](https://x)\n";
        let result = patch(readme, BADGE, "Discord Presence");
        assert_eq!(result.outcome, PatchOutcome::Prepended);
    }

    #[test]
    fn identifier_grammar() {
        for ok in ["Discord", "My Badge (v2)", "a_b-c", "one two three four five six"] {
            assert!(is_valid_identifier(ok), "expected valid: {ok}");
        }
        for bad in [
            "",
            "two  spaces",
            " leading",
            "trailing ",
            "one two three four five six seven",
            "emoji 🎮",
        ] {
            assert!(!is_valid_identifier(bad), "expected invalid: {bad}");
        }
    }
}
