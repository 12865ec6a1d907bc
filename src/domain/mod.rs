//! Core pricing entities, validation rules and ports

pub mod component;
pub mod metric;
pub mod ports;
pub mod tier;

pub use component::{PlanDuration, UsageComponent};
pub use metric::{
    merge_filters, ComparisonValue, DisplayFilter, Filter, FilterOperator, Granularity, Metric,
    MetricType,
};
pub use ports::MetricSource;
pub use tier::{
    is_field_editable, validate_tiers, BatchRoundingType, RangeConvention, Tier, TierCheck,
    TierField, TierPatch, TierReport, TierType, TierValidator,
};
