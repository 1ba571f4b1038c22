//! Domain values consumed and produced by the matching engine.
//!
//! Actions and goals are read-only inputs; relationships are always freshly
//! constructed, never mutated by the matchers.

pub mod action;
pub mod goal;
pub mod hints;
pub mod relationship;

pub use action::{Action, Measurement};
pub use goal::{Goal, Target};
pub use hints::ActionabilityHints;
pub use relationship::{ActionGoalRelationship, MatchMethod, MatchSignal};
