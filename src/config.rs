//! Engine configuration.
//!
//! Every tunable lives in an explicit value passed into each call. Files are
//! JSON; any omitted field keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agreement::UncodedPolicy;
use crate::optimizer::SearchStrategy;
use crate::tiling::TieBreak;

/// Default segment width in characters.
pub const DEFAULT_TILE_WIDTH: usize = 100;

/// Disagreement records kept for manual review.
pub const DEFAULT_MAX_DISAGREEMENTS: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub agreement: AgreementConfig,
    pub scale: ScaleConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agreement.validate()?;
        self.scale.validate()
    }
}

/// Configuration for the coder-agreement path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgreementConfig {
    // -- Tiling --------------------------------------------------------------

    /// Segment width in characters. Every coder in one run shares the tiling.
    pub tile_width: usize,
    /// Which coding wins when several codings of one coder overlap a segment.
    pub tie_break: TieBreak,

    // -- Metric semantics ----------------------------------------------------

    /// Overrides each metric's default handling of uncoded segments.
    /// `None` keeps percent agreement and Kappa at `category`, and
    /// Krippendorff's Alpha at `missing`.
    pub treat_uncoded_as: Option<UncodedPolicy>,
    /// Clamp Kappa and Krippendorff's Alpha to [0, 1]. Disabling it exposes
    /// worse-than-chance agreement as negative values.
    pub clamp_negative: bool,
    /// Cap on disagreement records returned with Cohen's Kappa.
    pub max_disagreements: usize,

    // -- Uncertainty ---------------------------------------------------------

    /// Two-sided confidence level for Kappa and bootstrap intervals.
    pub confidence_level: f64,
    /// Bootstrap resamples for Krippendorff's Alpha. 0 disables the interval.
    pub bootstrap_samples: usize,
    /// Seed for bootstrap resampling.
    pub rng_seed: u64,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tie_break: TieBreak::FirstInStorageOrder,
            treat_uncoded_as: None,
            clamp_negative: true,
            max_disagreements: DEFAULT_MAX_DISAGREEMENTS,
            confidence_level: 0.95,
            bootstrap_samples: 0,
            rng_seed: 1337,
        }
    }
}

impl AgreementConfig {
    pub fn with_tile_width(mut self, tile_width: usize) -> Self {
        self.tile_width = tile_width;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_width == 0 {
            return Err(ConfigError::Invalid("tile_width must be >= 1".to_string()));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::Invalid(
                "confidence_level must be in (0,1)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the scale-quality path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Flag an item for deletion when alpha-if-deleted exceeds alpha by more
    /// than this.
    pub delete_threshold: f64,
    /// Band around the base alpha inside which an item's impact is neutral.
    /// Kept separate from `delete_threshold`; the two gate different
    /// decisions.
    pub impact_threshold: f64,
    /// Alpha above this adds a redundancy advisory.
    pub redundancy_threshold: f64,
    /// Complete respondents required before alpha is reported.
    pub min_respondents: usize,
    pub strategy: SearchStrategy,
    /// Largest item count searched exhaustively; larger scales fall back to
    /// greedy elimination.
    pub exhaustive_max_items: usize,
    /// Rank optimizer candidates by unclamped alpha, which still orders
    /// subsets whose alpha is below zero. Off: candidates are ranked by the
    /// reported (clamped) alpha and ties keep the earliest item.
    pub rank_by_raw_alpha: bool,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            delete_threshold: 0.02,
            impact_threshold: 0.01,
            redundancy_threshold: 0.95,
            min_respondents: 3,
            strategy: SearchStrategy::Greedy,
            exhaustive_max_items: 14,
            rank_by_raw_alpha: false,
        }
    }
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.delete_threshold) {
            return Err(ConfigError::Invalid(
                "delete_threshold must be in [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.impact_threshold) {
            return Err(ConfigError::Invalid(
                "impact_threshold must be in [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.redundancy_threshold) {
            return Err(ConfigError::Invalid(
                "redundancy_threshold must be in [0,1]".to_string(),
            ));
        }
        if self.min_respondents < 2 {
            return Err(ConfigError::Invalid(
                "min_respondents must be >= 2".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: EngineConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}
