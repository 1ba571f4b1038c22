//! Inference engine: matchers + scorer over the action × goal cross product.
//!
//! For each pair the engine checks the period window, measures the metric
//! overlap, checks keywords when the goal declares any, and scores the
//! result. Pairs that do not qualify emit nothing, so output size stays
//! bounded to plausible matches.
//!
//! The engine is a plain value with no interior state. The outer loop over
//! actions is sharded with rayon once the cross product is large enough to
//! be worth it; output order is unspecified either way.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matching::{
    MetricMatchResult, matches_on_keywords, matches_on_metrics, matches_on_metrics_with_hints,
    matches_on_period,
};
use crate::model::{Action, ActionGoalRelationship, Goal, MatchSignal};
use crate::scoring::{ScoreOutcome, ScoringPolicy};

/// Cross products smaller than this run on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Actions per chunk for cancellable inference.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Everything the engine learned about one action-goal pair.
///
/// Exposed so callers can show *why* a match was or was not made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvaluation {
    pub period_match: bool,
    pub metric: MetricMatchResult,
    /// `None` when the goal declares no keywords.
    pub keyword_match: Option<bool>,
    pub outcome: ScoreOutcome,
}

impl MatchEvaluation {
    /// Signals to report on a relationship built from this evaluation.
    ///
    /// `Unit` and `Description` are reported together whenever the combined
    /// match passed.
    pub fn signals(&self) -> BTreeSet<MatchSignal> {
        let mut signals = BTreeSet::new();
        if self.period_match {
            signals.insert(MatchSignal::Period);
        }
        if self.outcome.is_match {
            signals.insert(MatchSignal::Unit);
            signals.insert(MatchSignal::Description);
        }
        signals
    }
}

/// Stateless action-to-goal inference engine.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    policy: ScoringPolicy,
    parallel: bool,
    parallel_threshold: usize,
    chunk_size: usize,
    unit_filter: bool,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            unit_filter: false,
        }
    }
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable rayon sharding.
    pub fn with_parallelism(mut self, parallel: bool, threshold: usize) -> Self {
        self.parallel = parallel;
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Count a shared measure only when the goal's hinted units allow it.
    ///
    /// Off by default: metric overlap is then computed over every target.
    pub fn with_unit_filter(mut self, enabled: bool) -> Self {
        self.unit_filter = enabled;
        self
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Run every matcher on one pair and score the result.
    pub fn evaluate(&self, action: &Action, goal: &Goal) -> MatchEvaluation {
        let period_match = matches_on_period(action, goal);
        let metric = if self.unit_filter {
            matches_on_metrics_with_hints(&action.measures, &goal.targets, goal.hints.as_ref())
        } else {
            matches_on_metrics(&action.measures, &goal.targets)
        };
        let keyword_match = goal.keywords().map(|kw| matches_on_keywords(action, kw));
        let outcome = self.policy.score(period_match, &metric, keyword_match);
        MatchEvaluation {
            period_match,
            metric,
            keyword_match,
            outcome,
        }
    }

    /// Infer the relationship between one pair, if any.
    pub fn infer_pair(
        &self,
        action: &Action,
        goal: &Goal,
        require_period_match: bool,
    ) -> Option<ActionGoalRelationship> {
        if require_period_match && !matches_on_period(action, goal) {
            return None;
        }

        let evaluation = self.evaluate(action, goal);
        if !evaluation.outcome.is_match {
            return None;
        }

        Some(ActionGoalRelationship::auto_inferred(
            action.id,
            goal.id,
            evaluation.metric.contribution.unwrap_or(0.0),
            evaluation.outcome.overall_confidence,
            evaluation.signals(),
        ))
    }

    /// Infer relationships for one action against every goal.
    pub fn infer_for_action(
        &self,
        action: &Action,
        goals: &[Goal],
        require_period_match: bool,
    ) -> Vec<ActionGoalRelationship> {
        goals
            .iter()
            .filter_map(|goal| self.infer_pair(action, goal, require_period_match))
            .collect()
    }

    /// Infer relationships over the full action × goal cross product.
    pub fn infer_matches(
        &self,
        actions: &[Action],
        goals: &[Goal],
        require_period_match: bool,
    ) -> Vec<ActionGoalRelationship> {
        let started = Instant::now();
        let pairs = actions.len().saturating_mul(goals.len());
        let sharded = self.parallel && pairs >= self.parallel_threshold;

        tracing::debug!(
            actions = actions.len(),
            goals = goals.len(),
            require_period_match,
            sharded,
            "starting inference batch"
        );

        let matches: Vec<ActionGoalRelationship> = if sharded {
            actions
                .par_iter()
                .flat_map_iter(|action| self.infer_for_action(action, goals, require_period_match))
                .collect()
        } else {
            actions
                .iter()
                .flat_map(|action| self.infer_for_action(action, goals, require_period_match))
                .collect()
        };

        tracing::info!(
            pairs,
            matches = matches.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "inference batch complete"
        );

        matches
    }

    /// [`infer_matches`](Self::infer_matches) in chunks of actions, stopping
    /// between chunks once `cancel` is set.
    ///
    /// Returns the relationships produced before cancellation was observed.
    pub fn infer_matches_cancellable(
        &self,
        actions: &[Action],
        goals: &[Goal],
        require_period_match: bool,
        cancel: &AtomicBool,
    ) -> Vec<ActionGoalRelationship> {
        let mut matches = Vec::new();
        for (index, chunk) in actions.chunks(self.chunk_size).enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::debug!(
                    chunk = index,
                    processed = index * self.chunk_size,
                    total = actions.len(),
                    "inference cancelled"
                );
                break;
            }
            matches.extend(self.infer_matches(chunk, goals, require_period_match));
        }
        matches
    }
}

/// Infer relationships with the default engine.
pub fn infer_matches(
    actions: &[Action],
    goals: &[Goal],
    require_period_match: bool,
) -> Vec<ActionGoalRelationship> {
    InferenceEngine::default().infer_matches(actions, goals, require_period_match)
}
