//! Action-to-goal inference: the cross-product engine and the batch
//! use cases built on top of it.

pub mod engine;
pub mod session;

pub use engine::{InferenceEngine, MatchEvaluation, infer_matches};
pub use session::{
    InferenceSession, SessionSummary, infer_all, infer_for_goal, infer_for_new_action,
    infer_for_period, quick_infer,
};
