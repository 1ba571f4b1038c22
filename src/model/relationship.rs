//! Action-goal relationships: the engine's output and the persisted artifact.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ActionId, GoalId, RelationshipId};

/// How a relationship was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Computed by the inference engine.
    AutoInferred,
    /// Inferred, then confirmed by the user.
    UserConfirmed,
    /// Declared by the user directly.
    Manual,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AutoInferred => write!(f, "auto_inferred"),
            Self::UserConfirmed => write!(f, "user_confirmed"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// A signal that fired while matching. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    /// The action fell inside the goal's active window.
    Period,
    /// The action measured something the goal targets.
    Unit,
    /// The action's text supported the match.
    Description,
}

impl std::fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Period => write!(f, "period"),
            Self::Unit => write!(f, "unit"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// A judgement that an action advances a goal.
///
/// Invariants: `contribution >= 0` and `confidence` in `[0.0, 1.0]`. At most
/// one relationship per `(action_id, goal_id)` is meaningful, but enforcing
/// that is the storage layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionGoalRelationship {
    pub id: RelationshipId,
    pub action_id: ActionId,
    pub goal_id: GoalId,
    pub contribution: f64,
    pub match_method: MatchMethod,
    pub confidence: f64,
    #[serde(default)]
    pub matched_on: BTreeSet<MatchSignal>,
    pub created_at: DateTime<Utc>,
}

impl ActionGoalRelationship {
    /// A freshly inferred relationship with a new id.
    pub fn auto_inferred(
        action_id: ActionId,
        goal_id: GoalId,
        contribution: f64,
        confidence: f64,
        matched_on: BTreeSet<MatchSignal>,
    ) -> Self {
        Self {
            id: RelationshipId::new(),
            action_id,
            goal_id,
            contribution: contribution.max(0.0),
            match_method: MatchMethod::AutoInferred,
            confidence: confidence.clamp(0.0, 1.0),
            matched_on,
            created_at: Utc::now(),
        }
    }

    /// Whether a human stands behind this relationship.
    pub fn is_certain(&self) -> bool {
        matches!(
            self.match_method,
            MatchMethod::UserConfirmed | MatchMethod::Manual
        )
    }

    /// Whether this relationship links the given pair.
    pub fn links(&self, action_id: ActionId, goal_id: GoalId) -> bool {
        self.action_id == action_id && self.goal_id == goal_id
    }
}
