//! Goals: objectives with an optional active window and measurable targets.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hints::ActionabilityHints;
use crate::id::{GoalId, MeasureId};

/// A measure the goal wants evidenced, and how much of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub measure: MeasureId,
    pub target_value: f64,
}

impl Target {
    pub fn new(measure: impl Into<MeasureId>, target_value: f64) -> Self {
        Self {
            measure: measure.into(),
            target_value,
        }
    }
}

/// A user objective.
///
/// The active window only applies when both `start_date` and `target_date`
/// are present; a goal with one bound or none is unconstrained in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    /// Measurable targets, in declaration order.
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub hints: Option<ActionabilityHints>,
}

impl Goal {
    /// Create an unconstrained goal with a fresh id and no targets.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: GoalId::new(),
            title: Some(title.into()),
            start_date: None,
            target_date: None,
            targets: Vec::new(),
            hints: None,
        }
    }

    pub fn with_id(mut self, id: GoalId) -> Self {
        self.id = id;
        self
    }

    /// Constrain the goal to the closed window `[start, target]`.
    pub fn with_window(mut self, start: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.target_date = Some(target);
        self
    }

    /// Declare a target, replacing an earlier target on the same measure.
    pub fn with_target(mut self, measure: impl Into<MeasureId>, target_value: f64) -> Self {
        let measure = measure.into();
        match self.targets.iter_mut().find(|t| t.measure == measure) {
            Some(existing) => existing.target_value = target_value,
            None => self.targets.push(Target {
                measure,
                target_value,
            }),
        }
        self
    }

    pub fn with_hints(mut self, hints: ActionabilityHints) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Attach hints from a stored JSON blob. Malformed or empty blobs leave the
    /// goal without hints (unit-only matching).
    pub fn with_actionability_json(mut self, raw: &str) -> Self {
        self.hints = ActionabilityHints::parse_or_fallback(raw, self.label());
        self
    }

    /// The closed active window, if both bounds are present.
    pub fn active_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start_date.zip(self.target_date)
    }

    pub fn is_time_bound(&self) -> bool {
        self.active_window().is_some()
    }

    pub fn is_measurable(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Required keywords, if the goal declares a non-empty keyword list.
    pub fn keywords(&self) -> Option<&BTreeSet<String>> {
        self.hints
            .as_ref()
            .map(|h| &h.required_keywords)
            .filter(|k| !k.is_empty())
    }

    /// Whether `measure` is one of the goal's targets.
    pub fn targets_measure(&self, measure: &MeasureId) -> bool {
        self.targets.iter().any(|t| &t.measure == measure)
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled goal)")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn window_requires_both_bounds() {
        let now = Utc::now();
        let mut goal = Goal::new("Run 120km");
        assert!(!goal.is_time_bound());

        goal.start_date = Some(now);
        assert!(goal.active_window().is_none(), "half-open window is unconstrained");

        goal.target_date = Some(now + Duration::days(70));
        assert_eq!(goal.active_window(), Some((now, now + Duration::days(70))));
    }

    #[test]
    fn duplicate_target_replaces_value() {
        let goal = Goal::new("Run")
            .with_target("km", 100.0)
            .with_target("sessions", 20.0)
            .with_target("km", 120.0);
        assert_eq!(goal.targets.len(), 2);
        assert_eq!(goal.targets[0], Target::new("km", 120.0));
    }

    #[test]
    fn keywords_absent_without_hints() {
        let goal = Goal::new("Read more").with_target("hours", 40.0);
        assert!(goal.keywords().is_none());

        let goal = goal.with_actionability_json(r#"{"units": ["hours"], "keywords": ["read"]}"#);
        let keywords = goal.keywords().unwrap();
        assert!(keywords.contains("read"));
    }

    #[test]
    fn malformed_actionability_leaves_goal_unhinted() {
        let goal = Goal::new("Write essays").with_actionability_json("{\"units\": [\"minutes\"");
        assert!(goal.hints.is_none());
        assert!(goal.keywords().is_none());
    }
}
