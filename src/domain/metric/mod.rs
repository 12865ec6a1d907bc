//! Metric aggregate
//!
//! Metric definitions as supplied by the catalog, and the display merge of
//! their filters.

pub mod filter;
pub mod model;

pub use filter::{merge_filters, ComparisonValue, DisplayFilter, Filter, FilterOperator};
pub use model::{AggregationType, Granularity, Metric, MetricType};
