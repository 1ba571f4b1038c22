//! Ambiguity triage: split inferred relationships into those safe to apply
//! silently and those that need a human decision.
//!
//! The split is a stable partition on `confidence >= threshold`; relative
//! order is preserved within each bucket.

use serde::{Deserialize, Serialize};

use crate::model::ActionGoalRelationship;

/// Default confidence at or above which a match is applied without review.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// The two buckets produced by [`filter_ambiguous`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub confident: Vec<ActionGoalRelationship>,
    pub ambiguous: Vec<ActionGoalRelationship>,
}

impl TriageOutcome {
    pub fn len(&self) -> usize {
        self.confident.len() + self.ambiguous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether anything is waiting on a human.
    pub fn needs_review(&self) -> bool {
        !self.ambiguous.is_empty()
    }
}

/// Partition `relationships` by `confidence_threshold` (inclusive).
pub fn filter_ambiguous(
    relationships: Vec<ActionGoalRelationship>,
    confidence_threshold: f64,
) -> TriageOutcome {
    let (confident, ambiguous) = relationships
        .into_iter()
        .partition(|r| is_confident(r, confidence_threshold));
    TriageOutcome {
        confident,
        ambiguous,
    }
}

/// Borrowing variant of [`filter_ambiguous`].
pub fn partition_refs(
    relationships: &[ActionGoalRelationship],
    confidence_threshold: f64,
) -> (Vec<&ActionGoalRelationship>, Vec<&ActionGoalRelationship>) {
    relationships
        .iter()
        .partition(|r| is_confident(r, confidence_threshold))
}

fn is_confident(relationship: &ActionGoalRelationship, threshold: f64) -> bool {
    relationship.confidence >= threshold
}
