//! Metric catalog backed by a JSON file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::metric::Metric;
use crate::domain::ports::MetricSource;
use crate::shared::errors::CatalogError;

/// Reads a JSON array of metrics on every listing, so edits to the file are
/// picked up by the next session.
#[derive(Debug, Clone)]
pub struct JsonFileMetricSource {
    path: PathBuf,
}

impl JsonFileMetricSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetricSource for JsonFileMetricSource {
    async fn list_metrics(&self) -> Result<Vec<Metric>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        let metrics: Vec<Metric> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), count = metrics.len(), "Metric catalog file read");
        Ok(metrics)
    }
}

// ── Tests ──────────────────────────────────────────────────────
