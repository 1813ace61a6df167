use crate::config::TimeConfig;
use crate::types::{ActivityKind, TimeDisplay, Timestamps};
use chrono::{DateTime, Utc};
use std::fmt;

pub const JUST_STARTED: &str = "Just started.";

const UNIT_LABELS: [&str; 3] = ["hours", "minutes", "seconds"];

/// Time annotation appended to the badge status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeText {
    /// Unit phrase such as `2 hours elapsed.` or `Just started.`.
    Phrase(String),
    /// Track position for activities with a known end, e.g. `0:01:05 of 0:03:20`.
    Progress { elapsed: String, total: String },
}

impl fmt::Display for TimeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeText::Phrase(phrase) => f.write_str(phrase),
            TimeText::Progress { elapsed, total } => write!(f, "{elapsed} of {total}"),
        }
    }
}

/// Whole-unit components of a duration. Only the components selected by the
/// display mode are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Units {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Units {
    fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    fn values(&self) -> [u64; 3] {
        [self.hours, self.minutes, self.seconds]
    }
}

/// Build the time annotation for an activity, or `None` when time display is
/// off or the start timestamp is out of range.
pub fn format(
    timestamps: &Timestamps,
    now: DateTime<Utc>,
    kind: ActivityKind,
    config: &TimeConfig,
) -> Option<TimeText> {
    if !config.display.is_enabled() {
        return None;
    }

    let start = timestamps.start_time()?;
    let elapsed = seconds_between(start, now);

    let Some(end) = timestamps.end_time() else {
        let units = decompose(elapsed, config.display);
        return Some(TimeText::Phrase(phrase(
            units,
            config.shorthand,
            &config.elapsed_override,
        )));
    };

    if kind == ActivityKind::SpotifyActivity {
        tracing::debug!(elapsed, total = seconds_between(start, end), "track position");
        return Some(TimeText::Progress {
            elapsed: clock(elapsed),
            total: clock(seconds_between(start, end)),
        });
    }

    let remaining = seconds_between(now, end);
    let units = decompose(remaining, config.display);
    Some(TimeText::Phrase(phrase(
        units,
        config.shorthand,
        &config.remaining_override,
    )))
}

/// Whole seconds from `from` to `to`, clamped at zero.
fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

/// Split `total_seconds` into the components shown for `display`.
pub fn decompose(total_seconds: u64, display: TimeDisplay) -> Units {
    match display {
        TimeDisplay::Disabled => Units::default(),
        TimeDisplay::Hours => Units {
            hours: total_seconds / 3600,
            ..Units::default()
        },
        TimeDisplay::Minutes => Units {
            minutes: total_seconds / 60,
            ..Units::default()
        },
        TimeDisplay::Seconds => Units {
            seconds: total_seconds,
            ..Units::default()
        },
        TimeDisplay::HoursMinutes => {
            let (hours, minutes) = reduce_minutes(total_seconds / 60);
            Units {
                hours,
                minutes,
                seconds: 0,
            }
        }
    }
}

/// Carry whole hours out of a minute count, one hour per step.
pub fn reduce_minutes(total_minutes: u64) -> (u64, u64) {
    let mut hours = 0;
    let mut minutes = total_minutes;
    while minutes >= 60 {
        hours += 1;
        minutes -= 60;
    }
    (hours, minutes)
}

/// Labels for hours, minutes and seconds, in that order.
pub fn unit_labels(units: Units, shorthand: bool) -> [&'static str; 3] {
    let values = units.values();
    std::array::from_fn(|i| {
        let full = UNIT_LABELS[i];
        if shorthand {
            &full[..1]
        } else if values[i] <= 1 {
            &full[..full.len() - 1]
        } else {
            full
        }
    })
}

fn phrase(units: Units, shorthand: bool, suffix: &str) -> String {
    if units.is_zero() {
        return JUST_STARTED.to_string();
    }

    let labels = unit_labels(units, shorthand);
    let parts: Vec<String> = units
        .values()
        .iter()
        .zip(labels)
        .filter(|(value, _)| **value > 0)
        .map(|(value, label)| format!("{value} {label}"))
        .collect();

    format!("{} {}", parts.join(" "), suffix)
}

/// `H:MM:SS`, with a leading day count once the duration passes 24 hours.
pub fn clock(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let hms = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => hms,
        1 => format!("1 day, {hms}"),
        n => format!("{n} days, {hms}"),
    }
}
