//! The three evidence matchers: period, metric overlap, and keywords.
//!
//! All matchers are pure, total functions over well-formed inputs. They hold
//! no state and are safe to call from any number of threads.

pub mod keyword;
pub mod metric;
pub mod period;

pub use keyword::matches_on_keywords;
pub use metric::{MetricMatchResult, matches_on_metrics, matches_on_metrics_with_hints};
pub use period::matches_on_period;
