//! Tier DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::tier::{BatchRoundingType, RangeConvention, Tier, TierCheck, TierReport};

/// A tier as exchanged over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TierDto {
    /// `free`, `flat` or `per_unit`
    #[serde(rename = "type")]
    pub tier_type: String,
    #[schema(value_type = f64)]
    pub range_start: Decimal,
    /// Omitted or `null` for an open-ended tier
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub range_end: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub cost_per_batch: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub metric_units_per_batch: Option<Decimal>,
    /// `round_up`, `round_down`, `round_nearest` or `no_rounding`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub batch_rounding_type: Option<BatchRoundingType>,
}

impl From<Tier> for TierDto {
    fn from(t: Tier) -> Self {
        Self {
            tier_type: t.tier_type.into(),
            range_start: t.range_start,
            range_end: t.range_end,
            cost_per_batch: t.cost_per_batch,
            metric_units_per_batch: t.metric_units_per_batch,
            batch_rounding_type: t.batch_rounding_type,
        }
    }
}

impl From<TierDto> for Tier {
    fn from(d: TierDto) -> Self {
        Self {
            tier_type: d.tier_type.into(),
            range_start: d.range_start,
            range_end: d.range_end,
            cost_per_batch: d.cost_per_batch,
            metric_units_per_batch: d.metric_units_per_batch,
            batch_rounding_type: d.batch_rounding_type,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidateTiersRequest {
    #[validate(length(min = 1, message = "at least one tier is required"))]
    pub tiers: Vec<TierDto>,
    /// Overrides the configured convention: `half_open`, `closed` or `lenient`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub range_convention: Option<RangeConvention>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TierCheckDto {
    pub index: usize,
    pub is_valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TierValidationResponse {
    pub is_valid: bool,
    /// Message that blocks saving, if any
    pub message: Option<String>,
    /// Position of the first failing tier
    pub first_invalid_index: Option<usize>,
    pub range_convention: String,
    pub checks: Vec<TierCheckDto>,
}

impl TierValidationResponse {
    pub fn new(report: TierReport, convention: RangeConvention) -> Self {
        let message = report.blocking_message();
        let is_valid = report.is_valid();
        let first_invalid_index = report.first_invalid_index();
        Self {
            is_valid,
            message,
            first_invalid_index,
            range_convention: convention.to_string(),
            checks: report
                .into_checks()
                .into_iter()
                .enumerate()
                .map(|(index, TierCheck { is_valid, message })| TierCheckDto {
                    index,
                    is_valid,
                    message,
                })
                .collect(),
        }
    }
}
