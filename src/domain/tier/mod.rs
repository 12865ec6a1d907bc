//! Tier aggregate
//!
//! Contains the Tier entity, the ladder validator, and row rendering.

pub mod display;
pub mod model;
pub mod validation;

pub use display::{render_rows, TierRow};
pub use model::{
    is_field_editable, BatchRoundingType, FieldInput, Tier, TierField, TierPatch, TierType,
};
pub use validation::{
    validate_tiers, RangeConvention, TierCheck, TierReport, TierValidator, RANGE_INVALID,
    RANGE_INVALID_FIRST, TIERS_INVALID, UNIT_INVALID,
};
