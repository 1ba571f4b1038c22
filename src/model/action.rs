//! Logged actions: what happened, when, and with what measured quantities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ActionId, MeasureId};

/// A single measured quantity recorded for an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measure: MeasureId,
    pub value: f64,
}

impl Measurement {
    pub fn new(measure: impl Into<MeasureId>, value: f64) -> Self {
        Self {
            measure: measure.into(),
            value,
        }
    }
}

/// A logged occurrence with a timestamp, free text, and measured quantities.
///
/// A measure appears at most once per action; [`Action::with_measure`]
/// replaces the value of a measure that is already recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub log_time: DateTime<Utc>,
    /// Recorded quantities, in recording order.
    #[serde(default)]
    pub measures: Vec<Measurement>,
}

impl Action {
    /// Create an action with a fresh id and no measures.
    pub fn new(title: impl Into<String>, log_time: DateTime<Utc>) -> Self {
        Self {
            id: ActionId::new(),
            title: Some(title.into()),
            description: None,
            log_time,
            measures: Vec::new(),
        }
    }

    /// Create an action with no text at all.
    pub fn untitled(log_time: DateTime<Utc>) -> Self {
        Self {
            id: ActionId::new(),
            title: None,
            description: None,
            log_time,
            measures: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ActionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Record `value` for `measure`, replacing any earlier value.
    pub fn with_measure(mut self, measure: impl Into<MeasureId>, value: f64) -> Self {
        self.record(measure, value);
        self
    }

    /// Record `value` for `measure` in place, replacing any earlier value.
    pub fn record(&mut self, measure: impl Into<MeasureId>, value: f64) {
        let measure = measure.into();
        match self.measures.iter_mut().find(|m| m.measure == measure) {
            Some(existing) => existing.value = value,
            None => self.measures.push(Measurement { measure, value }),
        }
    }

    /// The value recorded for `measure`, if any.
    pub fn measure_value(&self, measure: &MeasureId) -> Option<f64> {
        self.measures
            .iter()
            .find(|m| &m.measure == measure)
            .map(|m| m.value)
    }

    /// Whether the action carries any non-blank free text.
    pub fn has_text(&self) -> bool {
        self.text_fields().next().is_some()
    }

    /// Non-blank title and description, in that order.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
    }

    /// Human-readable label for logs and CLI output.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("(untitled action)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-10-12T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn duplicate_measure_replaces_value() {
        let action = Action::new("Morning run", now())
            .with_measure("km", 3.0)
            .with_measure("minutes", 20.0)
            .with_measure("km", 5.0);

        assert_eq!(action.measures.len(), 2);
        assert_eq!(action.measure_value(&"km".into()), Some(5.0));
        // Replacement keeps the original recording position.
        assert_eq!(action.measures[0].measure.as_str(), "km");
    }

    #[test]
    fn text_fields_skip_blank_entries() {
        let action = Action::new("   ", now()).with_description("Yoga class");
        let fields: Vec<&str> = action.text_fields().collect();
        assert_eq!(fields, vec!["Yoga class"]);
        assert!(action.has_text());

        let silent = Action::untitled(now());
        assert!(!silent.has_text());
        assert_eq!(silent.label(), "(untitled action)");
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": "6a1f0d7e-3c9b-4e0a-9a51-2f7c1b8d4e90",
            "log_time": "2025-10-12T08:00:00Z",
            "measures": [{"measure": "km", "value": 5.0}]
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert!(action.title.is_none());
        assert!(action.description.is_none());
        assert_eq!(action.measure_value(&"km".into()), Some(5.0));
    }
}
