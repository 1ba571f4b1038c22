//! Identifier types for actions, goals, relationships, and measures.
//!
//! Actions, goals, and relationships are identified by UUID newtypes so a
//! relationship's identity survives confirmation and can serve as the
//! persistence layer's dedup key. Measures are identified by a stable string
//! handle such as `"km"` or `"sessions"`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, ":")).unwrap_or(s);
                Uuid::parse_str(raw).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a logged action.
    ActionId,
    "action"
);

uuid_id!(
    /// Identity of a goal.
    GoalId,
    "goal"
);

uuid_id!(
    /// Identity of an action-goal relationship.
    ///
    /// Preserved across [`confirm`](crate::lifecycle::confirm) so storage can
    /// replace rather than append.
    RelationshipId,
    "rel"
);

/// Stable handle for a unit of measure (e.g. `"km"`, `"minutes"`).
///
/// Comparison is exact; callers normalise handles when loading catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasureId(String);

impl MeasureId {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MeasureId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MeasureId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for MeasureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
