//! In-memory metric source

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::metric::Metric;
use crate::domain::ports::MetricSource;
use crate::shared::errors::CatalogError;

/// Metric catalog held in memory, keyed by metric id.
///
/// Used for development, tests, and as the fallback when no catalog file is
/// configured.
pub struct InMemoryMetricSource {
    metrics: DashMap<String, Metric>,
}

impl InMemoryMetricSource {
    pub fn new() -> Self {
        Self {
            metrics: DashMap::new(),
        }
    }

    pub fn with_metrics(metrics: impl IntoIterator<Item = Metric>) -> Self {
        let source = Self::new();
        for metric in metrics {
            source.upsert(metric);
        }
        source
    }

    /// Insert or replace a metric by id
    pub fn upsert(&self, metric: Metric) {
        self.metrics.insert(metric.metric_id.clone(), metric);
    }

    pub fn remove(&self, metric_id: &str) -> Option<Metric> {
        self.metrics.remove(metric_id).map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for InMemoryMetricSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricSource for InMemoryMetricSource {
    async fn list_metrics(&self) -> Result<Vec<Metric>, CatalogError> {
        let mut metrics: Vec<Metric> = self.metrics.iter().map(|r| r.value().clone()).collect();
        metrics.sort_by(|a, b| a.metric_name.cmp(&b.metric_name));
        Ok(metrics)
    }
}

// ── Tests ──────────────────────────────────────────────────────
