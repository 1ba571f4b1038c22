//! Actionability hints: which units and keywords make an action count toward a goal.
//!
//! Goals are often stored with a free-form JSON hint such as
//! `{"units": ["minutes"], "keywords": ["yoga", "pilates*"]}`. The hint is
//! parsed once, when the goal is loaded, into [`ActionabilityHints`]. A hint
//! that is malformed or empty never fails the load: the goal falls back to
//! unit-only matching and a log line records why.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::HintError;
use crate::matching::keyword::normalize_keyword;

/// Strongly-typed actionability hints attached to a goal.
///
/// Units are stored trimmed and lower-cased. Keywords are stored trimmed,
/// lower-cased, with wildcard markers stripped; blank entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionabilityHints {
    #[serde(default)]
    pub allowed_units: BTreeSet<String>,
    #[serde(default)]
    pub required_keywords: BTreeSet<String>,
}

/// On-the-wire shape of a hint blob. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawHints {
    #[serde(default)]
    units: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

impl ActionabilityHints {
    /// Build hints from raw unit and keyword lists, normalising both.
    pub fn new<U, K>(units: U, keywords: K) -> Self
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let allowed_units = units
            .into_iter()
            .map(|u| u.as_ref().trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect();
        let required_keywords = keywords
            .into_iter()
            .filter_map(|k| normalize_keyword(k.as_ref()))
            .collect();
        Self {
            allowed_units,
            required_keywords,
        }
    }

    /// Parse a JSON hint string.
    ///
    /// Returns `Ok(None)` when the hint is well-formed but does not name both
    /// units and keywords, since a half-specified hint cannot discriminate
    /// between goals that share a unit.
    pub fn parse(raw: &str) -> Result<Option<Self>, HintError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| HintError::InvalidJson {
                message: e.to_string(),
            })?;
        Self::from_value(&value)
    }

    /// Parse an already-decoded JSON hint value.
    pub fn from_value(value: &serde_json::Value) -> Result<Option<Self>, HintError> {
        if value.is_null() {
            return Ok(None);
        }
        let raw: RawHints =
            serde_json::from_value(value.clone()).map_err(|e| HintError::UnexpectedShape {
                message: e.to_string(),
            })?;
        let hints = Self::new(raw.units, raw.keywords);
        if hints.allowed_units.is_empty() || hints.required_keywords.is_empty() {
            return Ok(None);
        }
        Ok(Some(hints))
    }

    /// Parse a hint string, degrading to `None` (unit-only matching) on any problem.
    ///
    /// `goal_label` only feeds the log line.
    pub fn parse_or_fallback(raw: &str, goal_label: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Self::resolve(Self::parse(raw), raw, goal_label)
    }

    /// Decode a JSON hint value, degrading to `None` on any problem.
    ///
    /// A string value is treated as an embedded JSON document, which is how
    /// hints are usually stored.
    pub fn value_or_fallback(value: &serde_json::Value, goal_label: &str) -> Option<Self> {
        match value {
            serde_json::Value::String(raw) => Self::parse_or_fallback(raw, goal_label),
            other => Self::resolve(Self::from_value(other), &other.to_string(), goal_label),
        }
    }

    fn resolve(
        parsed: Result<Option<Self>, HintError>,
        raw: &str,
        goal_label: &str,
    ) -> Option<Self> {
        match parsed {
            Ok(Some(hints)) => Some(hints),
            Ok(None) => {
                tracing::debug!(
                    goal = %truncate(goal_label, 50),
                    "empty actionability hints, falling back to unit matching"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    goal = %truncate(goal_label, 50),
                    raw = %raw,
                    error = %e,
                    "malformed actionability hints, falling back to unit matching"
                );
                None
            }
        }
    }

    /// Whether `measure` passes the unit filter. An empty filter admits everything.
    pub fn allows_unit(&self, measure: &str) -> bool {
        self.allowed_units.is_empty() || self.allowed_units.contains(&measure.trim().to_lowercase())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_units_and_keywords() {
        let hints = ActionabilityHints::parse(
            r#"{"units": [" Minutes "], "keywords": ["Yoga", "pilat*", "  ", "*"]}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(hints.allowed_units, BTreeSet::from(["minutes".to_string()]));
        assert_eq!(
            hints.required_keywords,
            BTreeSet::from(["yoga".to_string(), "pilat".to_string()])
        );
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = ActionabilityHints::parse("units: km").unwrap_err();
        assert!(matches!(err, HintError::InvalidJson { .. }));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let err = ActionabilityHints::parse(r#"{"units": "km", "keywords": ["run"]}"#).unwrap_err();
        assert!(matches!(err, HintError::UnexpectedShape { .. }));

        let err = ActionabilityHints::parse(r#"["km", "run"]"#).unwrap_err();
        assert!(matches!(err, HintError::UnexpectedShape { .. }));
    }

    #[test]
    fn half_specified_hints_are_ignored() {
        assert_eq!(
            ActionabilityHints::parse(r#"{"units": ["km"], "keywords": []}"#).unwrap(),
            None
        );
        assert_eq!(
            ActionabilityHints::parse(r#"{"keywords": ["run"]}"#).unwrap(),
            None
        );
        assert_eq!(ActionabilityHints::parse("null").unwrap(), None);
    }

    #[test]
    fn fallback_swallows_errors() {
        assert_eq!(
            ActionabilityHints::parse_or_fallback("{not json", "Run 120km this term"),
            None
        );
        assert_eq!(ActionabilityHints::parse_or_fallback("   ", "blank"), None);
        assert!(
            ActionabilityHints::parse_or_fallback(
                r#"{"units": ["km"], "keywords": ["run"]}"#,
                "Run 120km this term"
            )
            .is_some()
        );
    }

    #[test]
    fn value_fallback_accepts_embedded_string_and_object() {
        let embedded = serde_json::json!(r#"{"units": ["km"], "keywords": ["run"]}"#);
        let object = serde_json::json!({"units": ["km"], "keywords": ["run"]});
        let broken = serde_json::json!({"units": 3});

        let a = ActionabilityHints::value_or_fallback(&embedded, "g").unwrap();
        let b = ActionabilityHints::value_or_fallback(&object, "g").unwrap();
        assert_eq!(a, b);
        assert_eq!(ActionabilityHints::value_or_fallback(&broken, "g"), None);
    }

    #[test]
    fn unit_filter() {
        let hints = ActionabilityHints::new(["km", "miles"], ["run"]);
        assert!(hints.allows_unit("KM"));
        assert!(!hints.allows_unit("minutes"));

        let open = ActionabilityHints::new(Vec::<String>::new(), ["run"]);
        assert!(open.allows_unit("minutes"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 4), "héll");
        assert_eq!(truncate("short", 50), "short");
    }
}
