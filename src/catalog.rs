//! Catalog snapshots: actions and goals loaded from JSON files.
//!
//! This is the thin loading edge the CLI uses. It validates what the engine
//! assumes (unique ids, unique measures, non-negative values) and resolves
//! each goal's stored actionability hint exactly once, degrading malformed
//! hints to unit-only matching instead of failing the load.
//!
//! Goal records carry `actionability` either as an embedded JSON string, as
//! hints are typically stored, or as an inline object:
//!
//! ```json
//! [{
//!   "id": "9b2e…",
//!   "title": "Run 120km this term",
//!   "start_date": "2025-10-10T00:00:00Z",
//!   "target_date": "2025-12-19T00:00:00Z",
//!   "targets": [{"measure": "km", "target_value": 120.0}],
//!   "actionability": "{\"units\": [\"km\"], \"keywords\": [\"run\"]}"
//! }]
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};
use crate::id::{ActionId, GoalId};
use crate::model::{Action, ActionabilityHints, Goal, Target};

/// Stored shape of a goal, before hint resolution.
#[derive(Debug, Deserialize)]
struct GoalRecord {
    id: GoalId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    target_date: Option<DateTime<Utc>>,
    #[serde(default)]
    targets: Vec<Target>,
    #[serde(default)]
    actionability: Option<serde_json::Value>,
}

impl GoalRecord {
    fn into_goal(self) -> Goal {
        let label = self.title.as_deref().unwrap_or("(untitled goal)");
        let hints = self
            .actionability
            .as_ref()
            .and_then(|raw| ActionabilityHints::value_or_fallback(raw, label));
        Goal {
            id: self.id,
            title: self.title,
            start_date: self.start_date,
            target_date: self.target_date,
            targets: self.targets,
            hints,
        }
    }
}

/// An in-memory snapshot of actions and goals.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub actions: Vec<Action>,
    pub goals: Vec<Goal>,
}

impl Catalog {
    /// Load actions and goals from two JSON files.
    pub fn load(actions_path: &Path, goals_path: &Path) -> CatalogResult<Self> {
        let actions = read(actions_path)?;
        let goals = read(goals_path)?;
        let catalog = Self {
            actions: parse_actions(&actions, &actions_path.display().to_string())?,
            goals: parse_goals(&goals, &goals_path.display().to_string())?,
        };
        tracing::debug!(
            actions = catalog.actions.len(),
            goals = catalog.goals.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from JSON strings. `origin` names the source in errors.
    pub fn from_json(actions_json: &str, goals_json: &str, origin: &str) -> CatalogResult<Self> {
        Ok(Self {
            actions: parse_actions(actions_json, origin)?,
            goals: parse_goals(goals_json, origin)?,
        })
    }

    pub fn action(&self, id: ActionId) -> CatalogResult<&Action> {
        self.actions
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: "action",
                id: id.to_string(),
            })
    }

    pub fn goal(&self, id: GoalId) -> CatalogResult<&Goal> {
        self.goals
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                kind: "goal",
                id: id.to_string(),
            })
    }
}

fn read(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse and validate a JSON array of actions.
pub fn parse_actions(json: &str, origin: &str) -> CatalogResult<Vec<Action>> {
    let actions: Vec<Action> = serde_json::from_str(json).map_err(|e| CatalogError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    for action in &actions {
        if !seen.insert(action.id) {
            return Err(CatalogError::DuplicateId {
                kind: "action",
                id: action.id.to_string(),
            });
        }
        let mut measures = HashSet::new();
        for m in &action.measures {
            if !measures.insert(&m.measure) {
                return Err(CatalogError::DuplicateMeasure {
                    kind: "action",
                    id: action.id.to_string(),
                    measure: m.measure.to_string(),
                });
            }
            if m.value < 0.0 {
                return Err(CatalogError::NegativeMeasure {
                    action_id: action.id.to_string(),
                    measure: m.measure.to_string(),
                    value: m.value,
                });
            }
        }
    }
    Ok(actions)
}

/// Parse a JSON array of goal records, resolving their actionability hints.
pub fn parse_goals(json: &str, origin: &str) -> CatalogResult<Vec<Goal>> {
    let records: Vec<GoalRecord> = serde_json::from_str(json).map_err(|e| CatalogError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut goals = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(CatalogError::DuplicateId {
                kind: "goal",
                id: record.id.to_string(),
            });
        }
        let mut measures = HashSet::new();
        for t in &record.targets {
            if !measures.insert(&t.measure) {
                return Err(CatalogError::DuplicateMeasure {
                    kind: "goal",
                    id: record.id.to_string(),
                    measure: t.measure.to_string(),
                });
            }
        }
        goals.push(record.into_goal());
    }
    Ok(goals)
}
