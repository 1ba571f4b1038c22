//! Temporal filter: is an action inside a goal's active window?

use chrono::{DateTime, Utc};

use crate::model::{Action, Goal};

/// Whether `action` was logged inside `goal`'s active window.
///
/// A goal missing either bound exercises no temporal filter and admits every
/// action. Otherwise the window is closed at both ends.
pub fn matches_on_period(action: &Action, goal: &Goal) -> bool {
    match goal.active_window() {
        None => true,
        Some((start, end)) => within(action.log_time, start, end),
    }
}

/// Closed-interval containment: `start <= ts <= end`.
pub fn within(ts: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= ts && ts <= end
}

/// Whether `goal`'s active window overlaps `[start, end]`.
///
/// Unconstrained goals overlap every range.
pub fn overlaps(goal: &Goal, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    match goal.active_window() {
        None => true,
        Some((goal_start, goal_end)) => goal_start <= end && goal_end >= start,
    }
}
