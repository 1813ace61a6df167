use crate::types::{Activity, ActivityKind};
use std::collections::BTreeMap;

/// The activity chosen to represent the user on the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: ActivityKind,
    /// True when `kind` is the user's preferred activity.
    pub used_preferred: bool,
}

/// Pick one activity out of everything the user is doing.
///
/// Returns `None` when there are no activities; callers then render the
/// user's status instead. When the preferred kind is absent the first kind in
/// declaration order wins, so repeated calls on the same input agree.
pub fn select(
    activities: &BTreeMap<ActivityKind, Activity>,
    preferred: ActivityKind,
) -> Option<Selection> {
    if activities.contains_key(&preferred) {
        return Some(Selection {
            kind: preferred,
            used_preferred: true,
        });
    }

    let kind = *activities.keys().next()?;
    Some(Selection {
        kind,
        used_preferred: false,
    })
}
