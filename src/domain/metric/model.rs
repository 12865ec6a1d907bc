//! Metric domain entity

use serde::{Deserialize, Serialize};

use super::filter::{merge_filters, DisplayFilter, Filter};

/// Kind of value a metric measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Counted events
    Counter,
    /// Point-in-time level
    #[serde(alias = "stateful")]
    Gauge,
    Rate,
}

impl MetricType {
    /// Label used in metric listings
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Gauge => "continuous",
            Self::Counter | Self::Rate => "counter",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::Gauge => write!(f, "gauge"),
            Self::Rate => write!(f, "rate"),
        }
    }
}

/// How events are aggregated into a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    Count,
    Sum,
    Max,
    Min,
    Latest,
    Average,
    Unique,
}

impl AggregationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::Latest => "latest",
            Self::Average => "average",
            Self::Unique => "unique",
        }
    }
}

/// Time unit used for gauge metrics and proration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    /// No proration
    Total,
}

impl Granularity {
    /// Granularities a price can be prorated over, finest first
    pub const PRORATABLE: [Granularity; 5] = [
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Months,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Months => "months",
            Self::Total => "total",
        }
    }

    /// Singular unit name, `None` for [`Granularity::Total`]
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Seconds => Some("second"),
            Self::Minutes => Some("minute"),
            Self::Hours => Some("hour"),
            Self::Days => Some("day"),
            Self::Months => Some("month"),
            Self::Total => None,
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::Total
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billable metric definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_id: String,
    pub metric_name: String,
    pub metric_type: MetricType,
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub usage_aggregation_type: Option<AggregationType>,
    #[serde(default)]
    pub is_cost_metric: bool,
    #[serde(default)]
    pub numeric_filters: Option<Vec<Filter>>,
    #[serde(default)]
    pub categorical_filters: Option<Vec<Filter>>,
}

impl Metric {
    pub fn new(
        metric_id: impl Into<String>,
        metric_name: impl Into<String>,
        metric_type: MetricType,
    ) -> Self {
        Self {
            metric_id: metric_id.into(),
            metric_name: metric_name.into(),
            metric_type,
            granularity: None,
            event_name: None,
            property_name: None,
            usage_aggregation_type: None,
            is_cost_metric: false,
            numeric_filters: None,
            categorical_filters: None,
        }
    }

    pub fn is_gauge(&self) -> bool {
        self.metric_type == MetricType::Gauge
    }

    /// Numeric and categorical filters merged for display
    pub fn display_filters(&self) -> Option<Vec<DisplayFilter>> {
        merge_filters(
            self.numeric_filters.as_deref(),
            self.categorical_filters.as_deref(),
        )
    }

    /// Proration granularities allowed for this metric.
    ///
    /// Lists units from seconds up to and including the metric's own
    /// granularity (all of them when it has none), then `total`.
    pub fn proration_granularities(&self) -> Vec<Granularity> {
        let mut valid = Vec::with_capacity(Granularity::PRORATABLE.len() + 1);
        for g in Granularity::PRORATABLE {
            valid.push(g);
            if self.granularity == Some(g) {
                break;
            }
        }
        valid.push(Granularity::Total);
        valid
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::filter::{ComparisonValue, FilterOperator};

    #[test]
    fn stateful_is_read_as_gauge() {
        let t: MetricType = serde_json::from_str("\"stateful\"").unwrap();
        assert_eq!(t, MetricType::Gauge);
        assert_eq!(t.display_label(), "continuous");
        assert_eq!(MetricType::Rate.display_label(), "counter");
    }

    #[test]
    fn proration_stops_at_metric_granularity() {
        let mut m = Metric::new("m1", "cpu", MetricType::Gauge);
        m.granularity = Some(Granularity::Hours);
        assert_eq!(
            m.proration_granularities(),
            vec![
                Granularity::Seconds,
                Granularity::Minutes,
                Granularity::Hours,
                Granularity::Total
            ]
        );
    }

    #[test]
    fn proration_without_granularity_lists_everything() {
        let m = Metric::new("m1", "cpu", MetricType::Gauge);
        assert_eq!(m.proration_granularities().len(), 6);
    }

    #[test]
    fn metric_deserializes_with_defaults() {
        let m: Metric = serde_json::from_value(serde_json::json!({
            "metric_id": "met_1",
            "metric_name": "api_calls",
            "metric_type": "counter"
        }))
        .unwrap();
        assert!(!m.is_gauge());
        assert_eq!(m.display_filters(), None);
    }

    #[test]
    fn display_filters_merge_both_lists() {
        let mut m = Metric::new("m1", "calls", MetricType::Counter);
        m.numeric_filters = Some(vec![Filter::new(
            "latency",
            FilterOperator::Lt,
            ComparisonValue::Number(100.0),
        )]);
        m.categorical_filters = Some(vec![Filter::new(
            "region",
            FilterOperator::Eq,
            ComparisonValue::Text("us".into()),
        )]);
        let filters = m.display_filters().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].operator, Some("<"));
    }

    #[test]
    fn granularity_units() {
        assert_eq!(Granularity::Days.unit(), Some("day"));
        assert_eq!(Granularity::Total.unit(), None);
    }
}
