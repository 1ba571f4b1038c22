// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # goalmatch
//!
//! Infers which goals a logged action contributes to, and how confidently.
//!
//! ## Architecture
//!
//! - **Matchers** (`matching`): period window, metric overlap, keywords
//! - **Scoring** (`scoring`): combines matcher outputs into one confidence
//! - **Inference** (`inference`): the action × goal cross product, sharded
//!   with rayon, plus batch sessions built on top of it
//! - **Triage** (`triage`): confident matches vs. ones needing review
//! - **Lifecycle** (`lifecycle`): manual assignment and user confirmation
//! - **Catalog** (`catalog`): JSON snapshots of actions and goals
//!
//! ## Library usage
//!
//! ```
//! use chrono::Utc;
//! use goalmatch::inference::InferenceEngine;
//! use goalmatch::model::{Action, ActionabilityHints, Goal};
//! use goalmatch::triage::filter_ambiguous;
//!
//! let goal = Goal::new("Run 120km")
//!     .with_target("km", 120.0)
//!     .with_hints(ActionabilityHints::new(["km"], ["run"]));
//! let action = Action::new("Morning run", Utc::now()).with_measure("km", 5.0);
//!
//! let matches = InferenceEngine::new().infer_matches(&[action], &[goal], true);
//! let triaged = filter_ambiguous(matches, 0.7);
//! assert_eq!(triaged.confident.len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod id;
pub mod inference;
pub mod lifecycle;
pub mod matching;
pub mod model;
pub mod scoring;
pub mod triage;
