//! Metric catalog DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::metric::{DisplayFilter, Metric};

/// A metric as listed for selection
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricDto {
    pub metric_id: String,
    pub metric_name: String,
    /// `counter`, `gauge` or `rate`
    pub metric_type: String,
    /// Label shown in the metric table
    pub type_label: String,
    pub granularity: Option<String>,
    pub event_name: Option<String>,
    pub property_name: Option<String>,
    pub usage_aggregation_type: Option<String>,
    pub is_cost_metric: bool,
    /// Numeric and categorical filters merged, operators rewritten for display
    pub filters: Option<Vec<FilterDto>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterDto {
    pub property_name: String,
    /// Display token, `null` when the stored operator code is unknown
    pub operator: Option<String>,
    pub comparison_value: String,
    /// Whole filter as rendered in tables
    pub display: String,
}

impl From<DisplayFilter> for FilterDto {
    fn from(f: DisplayFilter) -> Self {
        Self {
            display: f.to_string(),
            property_name: f.property_name,
            operator: f.operator.map(str::to_string),
            comparison_value: f.comparison_value.to_string(),
        }
    }
}

impl From<&Metric> for MetricDto {
    fn from(m: &Metric) -> Self {
        Self {
            metric_id: m.metric_id.clone(),
            metric_name: m.metric_name.clone(),
            metric_type: m.metric_type.to_string(),
            type_label: m.metric_type.display_label().to_string(),
            granularity: m.granularity.map(|g| g.to_string()),
            event_name: m.event_name.clone(),
            property_name: m.property_name.clone(),
            usage_aggregation_type: m.usage_aggregation_type.map(|a| a.as_str().to_string()),
            is_cost_metric: m.is_cost_metric,
            filters: m
                .display_filters()
                .map(|fs| fs.into_iter().map(FilterDto::from).collect()),
        }
    }
}
