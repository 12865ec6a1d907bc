use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::metric::Granularity;
use crate::domain::tier::{TierField, TierType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Please enter a non-infinite range end")]
    MissingRangeEnd,

    #[error("Range end {0} leaves no room for another tier")]
    RangeExhausted(Decimal),

    #[error("Another tier already starts at {0}")]
    DuplicateRangeStart(Decimal),

    #[error("The first tier cannot be deleted")]
    FirstTierLocked,

    #[error("At least one tier is required")]
    LastRemainingTier,

    #[error("{field} is not editable on a {tier_type} tier")]
    FieldNotEditable {
        field: TierField,
        tier_type: TierType,
    },

    /// No tier starts at the given key. Callers only address rows they
    /// rendered, so this means editor state and caller state diverged.
    #[error("No tier starts at {0}")]
    TierNotFound(Decimal),

    #[error("{0}")]
    InvalidTiers(String),

    #[error("Please select a metric")]
    MetricRequired,

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Proration granularity {granularity} is not available for metric {metric}")]
    ProrationUnavailable {
        granularity: Granularity,
        metric: String,
    },
}

impl EditorError {
    /// Whether this error signals a bug rather than bad user input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, EditorError::TierNotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read metric catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed metric catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Metric catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
