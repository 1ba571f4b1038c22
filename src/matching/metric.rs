//! Measure overlap between an action's recorded quantities and a goal's targets.

use serde::{Deserialize, Serialize};

use crate::id::MeasureId;
use crate::model::{ActionabilityHints, Measurement, Target};

/// Outcome of comparing an action's measures with a goal's targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricMatchResult {
    pub has_overlap: bool,
    /// Sum of the action's values on shared measures. `None` when nothing is
    /// shared, distinguishing "not applicable" from "contributed zero".
    pub contribution: Option<f64>,
    /// Fraction of the goal's targets the action evidences, in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Shared measures, in goal-target order.
    pub shared_metrics: Vec<MeasureId>,
}

impl MetricMatchResult {
    /// The result for an action that evidences none of the goal's targets.
    pub fn none() -> Self {
        Self {
            has_overlap: false,
            contribution: None,
            confidence: 0.0,
            shared_metrics: Vec::new(),
        }
    }
}

/// Compare an action's measures with a goal's targets.
///
/// `confidence` is `|shared| / |targets|`, defined as `0.0` for a goal with
/// no targets. Shared values are summed without weighting.
pub fn matches_on_metrics(
    action_measures: &[Measurement],
    goal_targets: &[Target],
) -> MetricMatchResult {
    overlap(action_measures, goal_targets, |_| true)
}

/// [`matches_on_metrics`] restricted by a goal's hinted unit filter.
///
/// A shared measure only counts when the hints allow its unit. The confidence
/// denominator stays the full target count.
pub fn matches_on_metrics_with_hints(
    action_measures: &[Measurement],
    goal_targets: &[Target],
    hints: Option<&ActionabilityHints>,
) -> MetricMatchResult {
    match hints {
        Some(h) if !h.allowed_units.is_empty() => {
            overlap(action_measures, goal_targets, |m| h.allows_unit(m.as_str()))
        }
        _ => matches_on_metrics(action_measures, goal_targets),
    }
}

fn overlap(
    action_measures: &[Measurement],
    goal_targets: &[Target],
    admit: impl Fn(&MeasureId) -> bool,
) -> MetricMatchResult {
    if goal_targets.is_empty() || action_measures.is_empty() {
        return MetricMatchResult::none();
    }

    let mut shared_metrics: Vec<MeasureId> = Vec::new();
    let mut contribution = 0.0;

    for target in goal_targets {
        if shared_metrics.contains(&target.measure) || !admit(&target.measure) {
            continue;
        }
        if let Some(m) = action_measures.iter().find(|m| m.measure == target.measure) {
            contribution += m.value;
            shared_metrics.push(target.measure.clone());
        }
    }

    if shared_metrics.is_empty() {
        return MetricMatchResult::none();
    }

    MetricMatchResult {
        has_overlap: true,
        contribution: Some(contribution),
        confidence: shared_metrics.len() as f64 / goal_targets.len() as f64,
        shared_metrics,
    }
}
