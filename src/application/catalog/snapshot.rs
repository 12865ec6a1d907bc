//! Metric catalog snapshot
//!
//! An editing session reads the catalog exactly once. Everything derived from
//! that read is built together so no session ever sees a partial catalog.

use tracing::{debug, info};

use crate::domain::metric::Metric;
use crate::domain::ports::MetricSource;
use crate::shared::errors::CatalogError;

/// Immutable view of the metric catalog for one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSnapshot {
    metric_names: Vec<String>,
    metrics: Vec<Metric>,
    initial_gauge: bool,
}

impl MetricSnapshot {
    /// Fetch the catalog and derive the session's metric state.
    ///
    /// `editing_metric` is the metric of the component being edited, if any;
    /// it decides the initial gauge flag.
    pub async fn load(
        source: &dyn MetricSource,
        editing_metric: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let metrics = source.list_metrics().await?;
        let snapshot = Self::from_metrics(metrics, editing_metric);
        info!(
            metrics = snapshot.metrics.len(),
            initial_gauge = snapshot.initial_gauge,
            "Metric catalog loaded"
        );
        Ok(snapshot)
    }

    pub fn from_metrics(metrics: Vec<Metric>, editing_metric: Option<&str>) -> Self {
        let metric_names = metrics
            .iter()
            .filter(|m| !m.metric_name.is_empty())
            .map(|m| m.metric_name.clone())
            .collect();

        let initial_gauge = editing_metric
            .and_then(|name| metrics.iter().find(|m| m.metric_name == name))
            .is_some_and(Metric::is_gauge);

        if let Some(name) = editing_metric {
            debug!(metric = name, initial_gauge, "Editing existing component");
        }

        Self {
            metric_names,
            metrics,
            initial_gauge,
        }
    }

    pub fn metric_names(&self) -> &[String] {
        &self.metric_names
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn initial_gauge(&self) -> bool {
        self.initial_gauge
    }

    pub fn find(&self, metric_name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.metric_name == metric_name)
    }

    pub fn is_gauge(&self, metric_name: &str) -> bool {
        self.find(metric_name).is_some_and(Metric::is_gauge)
    }
}

// ── Tests ──────────────────────────────────────────────────────
