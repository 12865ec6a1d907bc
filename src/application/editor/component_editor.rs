//! Usage component editing session
//!
//! Wraps a [`TierEditor`] with the metric-level choices of a usage component:
//! which metric is billed, whether it is a gauge, and how its price is
//! prorated.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::catalog::MetricSnapshot;
use crate::application::editor::TierEditor;
use crate::domain::component::{PlanDuration, UsageComponent};
use crate::domain::metric::{Granularity, Metric};
use crate::domain::tier::TierValidator;
use crate::shared::errors::EditorError;

#[derive(Debug, Clone)]
pub struct ComponentEditor {
    snapshot: Arc<MetricSnapshot>,
    metric: Option<String>,
    metric_gauge: bool,
    /// Unit the gauge price is quoted in, `None` for non-gauge metrics
    gauge_granularity: Option<Granularity>,
    proration_granularity: Granularity,
    plan_duration: PlanDuration,
    tiers: TierEditor,
}

impl ComponentEditor {
    /// Open an editor, seeded from `existing` when editing a saved component
    pub fn open(
        snapshot: Arc<MetricSnapshot>,
        existing: Option<UsageComponent>,
        plan_duration: PlanDuration,
        validator: TierValidator,
    ) -> Self {
        let metric_gauge = snapshot.initial_gauge();

        let (metric, tiers, proration_granularity) = match existing {
            Some(component) => (
                Some(component.metric),
                TierEditor::from_tiers(component.tiers, validator),
                component.proration_granularity,
            ),
            None => (None, TierEditor::new(validator), Granularity::Total),
        };

        Self {
            snapshot,
            metric,
            metric_gauge,
            gauge_granularity: None,
            proration_granularity,
            plan_duration,
            tiers,
        }
    }

    pub fn snapshot(&self) -> &MetricSnapshot {
        &self.snapshot
    }

    pub fn metric(&self) -> Option<&str> {
        self.metric.as_deref()
    }

    pub fn is_gauge(&self) -> bool {
        self.metric_gauge
    }

    pub fn gauge_granularity(&self) -> Option<Granularity> {
        self.gauge_granularity
    }

    pub fn proration_granularity(&self) -> Granularity {
        self.proration_granularity
    }

    pub fn plan_duration(&self) -> PlanDuration {
        self.plan_duration
    }

    pub fn tiers(&self) -> &TierEditor {
        &self.tiers
    }

    pub fn tiers_mut(&mut self) -> &mut TierEditor {
        &mut self.tiers
    }

    pub fn select_metric(&mut self, metric_name: &str) -> Result<(), EditorError> {
        let selected = self
            .snapshot
            .find(metric_name)
            .ok_or_else(|| EditorError::UnknownMetric(metric_name.to_string()))?;

        self.metric_gauge = selected.is_gauge();
        self.gauge_granularity = if selected.is_gauge() {
            Some(selected.granularity.unwrap_or(Granularity::Total))
        } else {
            None
        };
        self.metric = Some(selected.metric_name.clone());

        debug!(
            metric = metric_name,
            gauge = self.metric_gauge,
            "Metric selected"
        );
        Ok(())
    }

    /// Explains which unit the entered price refers to, for gauge metrics
    pub fn price_hint(&self) -> Option<String> {
        let unit = match self.gauge_granularity? {
            Granularity::Total => self.plan_duration.unit(),
            g => g.unit()?,
        };
        Some(format!(
            "When inputting the price for this metric, you will be inputting the price per {}",
            unit
        ))
    }

    fn selected_metric(&self) -> Option<&Metric> {
        self.metric.as_deref().and_then(|name| self.snapshot.find(name))
    }

    /// Proration choices for the selected metric; only `total` without one
    pub fn valid_proration_granularities(&self) -> Vec<Granularity> {
        match self.selected_metric() {
            Some(metric) => metric.proration_granularities(),
            None => vec![Granularity::Total],
        }
    }

    pub fn set_proration_granularity(&mut self, granularity: Granularity) -> Result<(), EditorError> {
        if !self.valid_proration_granularities().contains(&granularity) {
            return Err(EditorError::ProrationUnavailable {
                granularity,
                metric: self.metric.clone().unwrap_or_default(),
            });
        }
        self.proration_granularity = granularity;
        Ok(())
    }

    /// Finalize the component. The editor is left untouched on failure.
    pub fn submit(&self) -> Result<UsageComponent, EditorError> {
        let metric = self.metric.clone().ok_or(EditorError::MetricRequired)?;
        let tiers = self.tiers.finish()?;
        let metric_id = self.selected_metric().map(|m| m.metric_id.clone());

        info!(
            metric = metric.as_str(),
            tiers = tiers.len(),
            proration = %self.proration_granularity,
            "Usage component finalized"
        );

        Ok(UsageComponent {
            metric,
            tiers,
            proration_granularity: self.proration_granularity,
            metric_id,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
