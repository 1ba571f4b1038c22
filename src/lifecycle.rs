//! Relationship lifecycle: manual assignment and confirmation.
//!
//! Manual and confirmed relationships are ground truth, so both carry
//! confidence 1.0. Confirmation keeps the relationship's identity: storage
//! treats the id as its dedup key and must replace the record, never append
//! a second one.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::error::{LifecycleError, LifecycleResult};
use crate::id::RelationshipId;
use crate::model::{Action, ActionGoalRelationship, Goal, MatchMethod};

/// Record that the user explicitly assigned `action` to `goal`.
///
/// Without an explicit `contribution`, the action's value on the first of
/// its measures that the goal targets is used, or `0.0` if none is.
/// Manual relationships carry no signal provenance.
pub fn create_manual(
    action: &Action,
    goal: &Goal,
    contribution: Option<f64>,
) -> LifecycleResult<ActionGoalRelationship> {
    let contribution = match contribution {
        Some(value) if !(value.is_finite() && value >= 0.0) => {
            return Err(LifecycleError::NegativeContribution { value });
        }
        Some(value) => value,
        None => action
            .measures
            .iter()
            .find(|m| goal.targets_measure(&m.measure))
            .map(|m| m.value)
            .unwrap_or(0.0),
    };

    Ok(ActionGoalRelationship {
        id: RelationshipId::new(),
        action_id: action.id,
        goal_id: goal.id,
        contribution,
        match_method: MatchMethod::Manual,
        confidence: 1.0,
        matched_on: BTreeSet::new(),
        created_at: Utc::now(),
    })
}

/// Promote a relationship to user-confirmed, preserving its identity.
///
/// Idempotent: confirming a confirmed relationship returns an equal value.
pub fn confirm(relationship: &ActionGoalRelationship) -> ActionGoalRelationship {
    ActionGoalRelationship {
        match_method: MatchMethod::UserConfirmed,
        confidence: 1.0,
        ..relationship.clone()
    }
}

/// Replace the record sharing `updated.id` in place.
///
/// Returns `false`, leaving `records` untouched, when no record has that id.
pub fn replace_by_id(
    records: &mut [ActionGoalRelationship],
    updated: ActionGoalRelationship,
) -> bool {
    match records.iter_mut().find(|r| r.id == updated.id) {
        Some(slot) => {
            tracing::debug!(
                id = %updated.id,
                from = %slot.match_method,
                to = %updated.match_method,
                "replacing relationship"
            );
            *slot = updated;
            true
        }
        None => false,
    }
}
