//! Composite confidence scoring.
//!
//! Period and metric evidence are both mandatory: if either is missing the
//! action does not qualify for the goal at all. Keyword evidence is advisory
//! and only modulates confidence.
//!
//! # Formula
//!
//! ```text
//! base = BASE_FLOOR + OVERLAP_WEIGHT × metric.confidence
//!
//! no keyword list      → base × NO_KEYWORD_FACTOR        (0.6)
//! keywords matched     → base × KEYWORD_MATCH_FACTOR     (1.0)
//! keywords not matched → base × KEYWORD_MISMATCH_FACTOR  (0.5)
//! ```
//!
//! A single fully-evidenced target with matching keywords scores 1.0;
//! period and metric alone score 0.6; an explicit keyword miss scores 0.5.

use serde::{Deserialize, Serialize};

use crate::matching::MetricMatchResult;

// ── Constants ──────────────────────────────────────────────────────────────

/// Confidence floor for any qualifying match.
pub const BASE_FLOOR: f64 = 0.5;

/// Weight of the metric-overlap fraction on top of the floor.
pub const OVERLAP_WEIGHT: f64 = 0.5;

/// Multiplier when the goal declares no keyword list.
pub const NO_KEYWORD_FACTOR: f64 = 0.6;

/// Multiplier when the goal's keywords appear in the action text.
pub const KEYWORD_MATCH_FACTOR: f64 = 1.0;

/// Multiplier when the goal's keywords are absent from the action text.
pub const KEYWORD_MISMATCH_FACTOR: f64 = 0.5;

// ── ScoringPolicy ──────────────────────────────────────────────────────────

/// Tunable scoring constants. `Default` reproduces the module constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_floor: f64,
    pub overlap_weight: f64,
    pub no_keyword_factor: f64,
    pub keyword_match_factor: f64,
    pub keyword_mismatch_factor: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_floor: BASE_FLOOR,
            overlap_weight: OVERLAP_WEIGHT,
            no_keyword_factor: NO_KEYWORD_FACTOR,
            keyword_match_factor: KEYWORD_MATCH_FACTOR,
            keyword_mismatch_factor: KEYWORD_MISMATCH_FACTOR,
        }
    }
}

/// Decision and confidence for one action-goal pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub is_match: bool,
    pub overall_confidence: f64,
}

impl ScoreOutcome {
    pub const NO_MATCH: Self = Self {
        is_match: false,
        overall_confidence: 0.0,
    };
}

impl ScoringPolicy {
    /// Combine matcher outputs into a decision and a confidence in `[0, 1]`.
    ///
    /// `keyword_match` is `None` when the goal declares no keyword list.
    pub fn score(
        &self,
        period_match: bool,
        metric_match: &MetricMatchResult,
        keyword_match: Option<bool>,
    ) -> ScoreOutcome {
        if !period_match || !metric_match.has_overlap {
            return ScoreOutcome::NO_MATCH;
        }

        let base = self.base_floor + self.overlap_weight * metric_match.confidence;
        let factor = match keyword_match {
            None => self.no_keyword_factor,
            Some(true) => self.keyword_match_factor,
            Some(false) => self.keyword_mismatch_factor,
        };

        ScoreOutcome {
            is_match: true,
            overall_confidence: (base * factor).clamp(0.0, 1.0),
        }
    }

    /// Named fields whose value must lie in `[0, 1]`.
    pub(crate) fn factors(&self) -> [(&'static str, f64); 5] {
        [
            ("scoring.base_floor", self.base_floor),
            ("scoring.overlap_weight", self.overlap_weight),
            ("scoring.no_keyword_factor", self.no_keyword_factor),
            ("scoring.keyword_match_factor", self.keyword_match_factor),
            ("scoring.keyword_mismatch_factor", self.keyword_mismatch_factor),
        ]
    }
}

/// Score with the default policy.
pub fn score(
    period_match: bool,
    metric_match: &MetricMatchResult,
    keyword_match: Option<bool>,
) -> ScoreOutcome {
    ScoringPolicy::default().score(period_match, metric_match, keyword_match)
}
