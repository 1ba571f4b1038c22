//! Inference sessions: batch use cases built on the engine.
//!
//! - [`infer_for_period`]: a term's worth of actions and goals, triaged.
//! - [`infer_for_new_action`]: "you just logged a run, does it count?"
//! - [`infer_for_goal`]: everything that counted toward one goal.
//! - [`quick_infer`]: one-off inference returning confident matches only.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::InferenceEngine;
use crate::id::ActionId;
use crate::matching::period;
use crate::model::{Action, ActionGoalRelationship, Goal};
use crate::triage::{DEFAULT_CONFIDENCE_THRESHOLD, filter_ambiguous};

/// Results of one batch inference run, organised for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceSession {
    pub actions_analyzed: usize,
    pub goals_analyzed: usize,
    /// Safe to apply without asking.
    pub confident: Vec<ActionGoalRelationship>,
    /// Need a human decision.
    pub ambiguous: Vec<ActionGoalRelationship>,
    /// Actions in scope that matched no goal at all.
    pub unmatched_actions: Vec<ActionId>,
    pub run_timestamp: DateTime<Utc>,
}

impl InferenceSession {
    pub fn total_matches(&self) -> usize {
        self.confident.len() + self.ambiguous.len()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from(self)
    }
}

/// Headline numbers for an [`InferenceSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub actions_analyzed: usize,
    pub goals_analyzed: usize,
    pub total_matches_found: usize,
    pub confident_matches: usize,
    pub ambiguous_matches: usize,
    pub unmatched_actions: usize,
    /// Matches per analysed action; `0.0` when no actions were analysed.
    pub match_rate: f64,
    pub run_timestamp: DateTime<Utc>,
}

impl From<&InferenceSession> for SessionSummary {
    fn from(session: &InferenceSession) -> Self {
        let total = session.total_matches();
        let match_rate = if session.actions_analyzed > 0 {
            total as f64 / session.actions_analyzed as f64
        } else {
            0.0
        };
        Self {
            actions_analyzed: session.actions_analyzed,
            goals_analyzed: session.goals_analyzed,
            total_matches_found: total,
            confident_matches: session.confident.len(),
            ambiguous_matches: session.ambiguous.len(),
            unmatched_actions: session.unmatched_actions.len(),
            match_rate,
            run_timestamp: session.run_timestamp,
        }
    }
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Analyzed {} action(s) against {} goal(s) at {}",
            self.actions_analyzed,
            self.goals_analyzed,
            self.run_timestamp.to_rfc3339()
        )?;
        writeln!(
            f,
            "  matches: {} ({} confident, {} need review)",
            self.total_matches_found, self.confident_matches, self.ambiguous_matches
        )?;
        writeln!(f, "  unmatched actions: {}", self.unmatched_actions)?;
        write!(f, "  match rate: {:.0}%", self.match_rate * 100.0)
    }
}

/// Run inference for every action logged in `[start, end]` against every
/// goal active during that range, and triage the result.
pub fn infer_for_period(
    engine: &InferenceEngine,
    actions: &[Action],
    goals: &[Goal],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    confidence_threshold: f64,
) -> InferenceSession {
    let period_actions: Vec<Action> = actions
        .iter()
        .filter(|a| period::within(a.log_time, start, end))
        .cloned()
        .collect();
    let period_goals: Vec<Goal> = goals
        .iter()
        .filter(|g| period::overlaps(g, start, end))
        .cloned()
        .collect();

    run_session(engine, period_actions, period_goals, true, confidence_threshold)
}

/// Run inference for a whole snapshot with no date filtering beyond each
/// goal's own window, which is checked only when `require_period_match`.
pub fn infer_all(
    engine: &InferenceEngine,
    actions: &[Action],
    goals: &[Goal],
    require_period_match: bool,
    confidence_threshold: f64,
) -> InferenceSession {
    run_session(
        engine,
        actions.to_vec(),
        goals.to_vec(),
        require_period_match,
        confidence_threshold,
    )
}

fn run_session(
    engine: &InferenceEngine,
    actions: Vec<Action>,
    goals: Vec<Goal>,
    require_period_match: bool,
    confidence_threshold: f64,
) -> InferenceSession {
    let matches = engine.infer_matches(&actions, &goals, require_period_match);

    let matched: HashSet<ActionId> = matches.iter().map(|m| m.action_id).collect();
    let unmatched_actions = actions
        .iter()
        .map(|a| a.id)
        .filter(|id| !matched.contains(id))
        .collect();

    let triaged = filter_ambiguous(matches, confidence_threshold);

    InferenceSession {
        actions_analyzed: actions.len(),
        goals_analyzed: goals.len(),
        confident: triaged.confident,
        ambiguous: triaged.ambiguous,
        unmatched_actions,
        run_timestamp: Utc::now(),
    }
}

/// Real-time inference for a newly logged action.
///
/// Only goals that are still open at `now` (no target date, or a target date
/// not yet passed) are considered. Results are sorted by confidence,
/// highest first.
pub fn infer_for_new_action(
    engine: &InferenceEngine,
    action: &Action,
    goals: &[Goal],
    now: DateTime<Utc>,
) -> Vec<ActionGoalRelationship> {
    let open_goals: Vec<Goal> = goals
        .iter()
        .filter(|g| g.target_date.is_none_or(|target| target >= now))
        .cloned()
        .collect();

    let mut matches = engine.infer_for_action(action, &open_goals, true);
    sort_by_confidence(&mut matches);
    matches
}

/// Find every action that contributes to `goal`.
///
/// `window` overrides the goal's own window. Without either, all actions are
/// considered and the period check is skipped.
pub fn infer_for_goal(
    engine: &InferenceEngine,
    goal: &Goal,
    actions: &[Action],
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Vec<ActionGoalRelationship> {
    let window = window.or_else(|| goal.active_window());
    let relevant: Vec<Action> = match window {
        Some((start, end)) => actions
            .iter()
            .filter(|a| period::within(a.log_time, start, end))
            .cloned()
            .collect(),
        None => actions.to_vec(),
    };

    engine.infer_matches(&relevant, std::slice::from_ref(goal), window.is_some())
}

/// One-off inference with the default engine, keeping confident matches only.
pub fn quick_infer(actions: &[Action], goals: &[Goal]) -> Vec<ActionGoalRelationship> {
    let matches = InferenceEngine::default().infer_matches(actions, goals, true);
    filter_ambiguous(matches, DEFAULT_CONFIDENCE_THRESHOLD).confident
}

/// Sort relationships by confidence, highest first.
pub fn sort_by_confidence(matches: &mut [ActionGoalRelationship]) {
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
