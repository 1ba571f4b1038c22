//! Rich diagnostic error types for the goalmatch engine.
//!
//! The matchers themselves are total functions and never fail. Errors only
//! arise at the edges: parsing actionability hints, loading configuration,
//! reading catalog snapshots, and constructing manual relationships. Each of
//! those subsystems defines its own miette-annotated error type, and
//! [`MatchError`] wraps them all for callers that want a single type.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the goalmatch crate.
#[derive(Debug, Error, Diagnostic)]
pub enum MatchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Hint(#[from] HintError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lifecycle(#[from] LifecycleError),
}

// ---------------------------------------------------------------------------
// Hint errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum HintError {
    #[error("actionability hints are not valid JSON: {message}")]
    #[diagnostic(
        code(goalmatch::hints::invalid_json),
        help(
            "Actionability hints must be a JSON object such as \
             {{\"units\": [\"km\"], \"keywords\": [\"run\"]}}. \
             The goal will fall back to unit-only matching until this is fixed."
        )
    )]
    InvalidJson { message: String },

    #[error("actionability hints have an unexpected shape: {message}")]
    #[diagnostic(
        code(goalmatch::hints::unexpected_shape),
        help(
            "Both `units` and `keywords` must be arrays of strings. \
             Other keys are ignored."
        )
    )]
    UnexpectedShape { message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(goalmatch::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(goalmatch::config::parse),
        help(
            "The config file must be valid TOML. Run `goalmatch init-config <path>` \
             to write a file with every field set to its default."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write config file {path}")]
    #[diagnostic(
        code(goalmatch::config::write),
        help("Check that the parent directory is writable and the disk is not full.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config value for `{field}`: {message}")]
    #[diagnostic(
        code(goalmatch::config::invalid),
        help("Thresholds and scoring factors must lie in [0.0, 1.0]; chunk_size must be > 0.")
    )]
    Invalid { field: String, message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    #[diagnostic(
        code(goalmatch::catalog::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {message}")]
    #[diagnostic(
        code(goalmatch::catalog::parse),
        help("Catalog files must contain a JSON array of action or goal records.")
    )]
    Parse { path: String, message: String },

    #[error("duplicate {kind} id {id}")]
    #[diagnostic(
        code(goalmatch::catalog::duplicate_id),
        help("Every action and goal in a snapshot must have a unique id.")
    )]
    DuplicateId { kind: &'static str, id: String },

    #[error("action {action_id} records a negative value {value} for measure `{measure}`")]
    #[diagnostic(
        code(goalmatch::catalog::negative_measure),
        help("Measured values must be non-negative. Fix the record at its source.")
    )]
    NegativeMeasure {
        action_id: String,
        measure: String,
        value: f64,
    },

    #[error("{kind} {id} lists measure `{measure}` more than once")]
    #[diagnostic(
        code(goalmatch::catalog::duplicate_measure),
        help("A measure may appear at most once per action and once per goal's targets.")
    )]
    DuplicateMeasure {
        kind: &'static str,
        id: String,
        measure: String,
    },

    #[error("no {kind} with id {id} in the snapshot")]
    #[diagnostic(
        code(goalmatch::catalog::not_found),
        help("List the snapshot file to find valid ids.")
    )]
    NotFound { kind: &'static str, id: String },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

// ---------------------------------------------------------------------------
// Lifecycle errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LifecycleError {
    #[error("contribution must be a finite non-negative number, got {value}")]
    #[diagnostic(
        code(goalmatch::lifecycle::negative_contribution),
        help(
            "Omit the contribution to infer it from the action's measures, \
             or pass a finite value >= 0."
        )
    )]
    NegativeContribution { value: f64 },
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

/// Convenience alias for functions returning goalmatch results.
pub type MatchResult<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_error_converts_to_match_error() {
        let err = HintError::InvalidJson {
            message: "expected value at line 1".into(),
        };
        let top: MatchError = err.into();
        assert!(matches!(top, MatchError::Hint(HintError::InvalidJson { .. })));
    }

    #[test]
    fn catalog_error_converts_to_match_error() {
        let err = CatalogError::NotFound {
            kind: "goal",
            id: "abc".into(),
        };
        let top: MatchError = err.into();
        assert!(matches!(top, MatchError::Catalog(CatalogError::NotFound { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = CatalogError::NegativeMeasure {
            action_id: "a-1".into(),
            measure: "km".into(),
            value: -2.5,
        };
        let msg = format!("{err}");
        assert!(msg.contains("a-1"));
        assert!(msg.contains("km"));
        assert!(msg.contains("-2.5"));

        let err = LifecycleError::NegativeContribution { value: -1.0 };
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = ConfigError::Invalid {
            field: "confidence_threshold".into(),
            message: "1.5 is outside [0, 1]".into(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("goalmatch::config::invalid"));
    }
}
