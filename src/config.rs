//! Matching configuration, persisted as TOML.
//!
//! Every field has a default, so a partial file (or none at all) is valid.
//!
//! ```toml
//! require_period_match = true
//! confidence_threshold = 0.7
//! parallel = true
//! parallel_threshold = 256
//! chunk_size = 64
//! hinted_unit_filter = false
//!
//! [scoring]
//! base_floor = 0.5
//! overlap_weight = 0.5
//! no_keyword_factor = 0.6
//! keyword_match_factor = 1.0
//! keyword_mismatch_factor = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::inference::InferenceEngine;
use crate::inference::engine::{DEFAULT_CHUNK_SIZE, DEFAULT_PARALLEL_THRESHOLD};
use crate::scoring::ScoringPolicy;
use crate::triage::DEFAULT_CONFIDENCE_THRESHOLD;

/// Tunables for inference and triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Skip pairs whose action falls outside the goal's window.
    pub require_period_match: bool,
    /// Confidence at or above which a match needs no review.
    pub confidence_threshold: f64,
    /// Shard large cross products across rayon's pool.
    pub parallel: bool,
    /// Minimum action × goal pairs before sharding kicks in.
    pub parallel_threshold: usize,
    /// Actions per chunk for cancellable runs.
    pub chunk_size: usize,
    /// Count a shared measure only when the goal's hinted units allow it.
    pub hinted_unit_filter: bool,
    pub scoring: ScoringPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            require_period_match: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            hinted_unit_filter: false,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl MatchConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else return the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Check that thresholds and scoring factors are in range.
    pub fn validate(&self) -> ConfigResult<()> {
        unit_interval("confidence_threshold", self.confidence_threshold)?;
        for (field, value) in self.scoring.factors() {
            unit_interval(field, value)?;
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                field: "chunk_size".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Build an engine honouring this config.
    pub fn engine(&self) -> InferenceEngine {
        InferenceEngine::new()
            .with_policy(self.scoring)
            .with_parallelism(self.parallel, self.parallel_threshold)
            .with_chunk_size(self.chunk_size)
            .with_unit_filter(self.hinted_unit_filter)
    }
}

fn unit_interval(field: &str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!("{value} is outside [0.0, 1.0]"),
        })
    }
}
