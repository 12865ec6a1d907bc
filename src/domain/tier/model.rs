//! Tier domain entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Charge type of a tier
///
/// Unknown strings are kept as [`TierType::Unrecognized`] so the validator can
/// report them instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TierType {
    /// Fixed amount for the whole range
    Flat,
    /// No charge
    Free,
    /// Amount per batch of metric units
    PerUnit,
    Unrecognized(String),
}

impl TierType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Flat => "flat",
            Self::Free => "free",
            Self::PerUnit => "per_unit",
            Self::Unrecognized(s) => s.as_str(),
        }
    }
}

impl Default for TierType {
    fn default() -> Self {
        Self::Free
    }
}

impl From<String> for TierType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "flat" => Self::Flat,
            "free" => Self::Free,
            "per_unit" => Self::PerUnit,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<&str> for TierType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TierType> for String {
    fn from(t: TierType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for TierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounding policy applied to usage before batches are billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchRoundingType {
    RoundUp,
    RoundDown,
    RoundNearest,
    NoRounding,
}

impl BatchRoundingType {
    pub const ALL: [BatchRoundingType; 4] = [
        Self::RoundUp,
        Self::RoundDown,
        Self::RoundNearest,
        Self::NoRounding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundUp => "round_up",
            Self::RoundDown => "round_down",
            Self::RoundNearest => "round_nearest",
            Self::NoRounding => "no_rounding",
        }
    }
}

impl std::fmt::Display for BatchRoundingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced segment of a usage ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Inclusive lower bound of the covered usage
    pub range_start: Decimal,
    /// Upper bound; `None` means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_batch: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_units_per_batch: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_rounding_type: Option<BatchRoundingType>,
}

impl Tier {
    /// Free tier starting at `range_start`, open-ended
    pub fn free(range_start: Decimal) -> Self {
        Self {
            tier_type: TierType::Free,
            range_start,
            range_end: None,
            cost_per_batch: Some(Decimal::ZERO),
            metric_units_per_batch: None,
            batch_rounding_type: None,
        }
    }

    pub fn flat(range_start: Decimal, cost_per_batch: Decimal) -> Self {
        Self {
            tier_type: TierType::Flat,
            cost_per_batch: Some(cost_per_batch),
            ..Self::free(range_start)
        }
    }

    pub fn per_unit(
        range_start: Decimal,
        cost_per_batch: Decimal,
        metric_units_per_batch: Decimal,
        batch_rounding_type: BatchRoundingType,
    ) -> Self {
        Self {
            tier_type: TierType::PerUnit,
            cost_per_batch: Some(cost_per_batch),
            metric_units_per_batch: Some(metric_units_per_batch),
            batch_rounding_type: Some(batch_rounding_type),
            ..Self::free(range_start)
        }
    }

    pub fn with_range_end(mut self, range_end: Decimal) -> Self {
        self.range_end = Some(range_end);
        self
    }

    pub fn is_open_ended(&self) -> bool {
        self.range_end.is_none()
    }

    /// Force the fields a charge type does not carry back to their fixed values.
    ///
    /// `free` tiers cost 0 and have no units; `flat` tiers have no units.
    pub fn normalize(&mut self) {
        match self.tier_type {
            TierType::Free => {
                self.cost_per_batch = Some(Decimal::ZERO);
                self.metric_units_per_batch = None;
            }
            TierType::Flat => {
                self.metric_units_per_batch = None;
            }
            TierType::PerUnit | TierType::Unrecognized(_) => {}
        }
    }
}

/// Shallow overwrite applied to a tier by an in-place edit.
///
/// `range_end` is doubly optional: `Some(None)` clears the bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierPatch {
    pub tier_type: Option<TierType>,
    pub range_start: Option<Decimal>,
    pub range_end: Option<Option<Decimal>>,
    pub cost_per_batch: Option<Decimal>,
    pub metric_units_per_batch: Option<Decimal>,
    pub batch_rounding_type: Option<BatchRoundingType>,
}

impl TierPatch {
    /// Fields this patch writes
    pub fn fields(&self) -> Vec<TierField> {
        let mut fields = Vec::new();
        if self.range_start.is_some() {
            fields.push(TierField::RangeStart);
        }
        if self.range_end.is_some() {
            fields.push(TierField::RangeEnd);
        }
        if self.tier_type.is_some() {
            fields.push(TierField::ChargeType);
        }
        if self.cost_per_batch.is_some() {
            fields.push(TierField::CostPerBatch);
        }
        if self.metric_units_per_batch.is_some() {
            fields.push(TierField::MetricUnitsPerBatch);
        }
        if self.batch_rounding_type.is_some() {
            fields.push(TierField::BatchRoundingType);
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn apply_to(self, tier: &mut Tier) {
        if let Some(t) = self.tier_type {
            tier.tier_type = t;
        }
        if let Some(start) = self.range_start {
            tier.range_start = start;
        }
        if let Some(end) = self.range_end {
            tier.range_end = end;
        }
        if let Some(cost) = self.cost_per_batch {
            tier.cost_per_batch = Some(cost);
        }
        if let Some(units) = self.metric_units_per_batch {
            tier.metric_units_per_batch = Some(units);
        }
        if let Some(rounding) = self.batch_rounding_type {
            tier.batch_rounding_type = Some(rounding);
        }
    }
}

/// Role of an editable tier column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierField {
    RangeStart,
    RangeEnd,
    ChargeType,
    CostPerBatch,
    MetricUnitsPerBatch,
    BatchRoundingType,
}

/// Input widget kind for a tier field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldInput {
    /// Pick one of a fixed set of values
    Select { options: &'static [&'static str] },
    /// Numeric entry with a lower bound
    Number { min: Decimal },
}

const CHARGE_TYPE_OPTIONS: &[&str] = &["per_unit", "free", "flat"];
const ROUNDING_OPTIONS: &[&str] = &["round_up", "round_down", "round_nearest", "no_rounding"];

impl TierField {
    pub const ALL: [TierField; 6] = [
        Self::RangeStart,
        Self::RangeEnd,
        Self::ChargeType,
        Self::CostPerBatch,
        Self::MetricUnitsPerBatch,
        Self::BatchRoundingType,
    ];

    /// Column heading
    pub fn label(&self) -> &'static str {
        match self {
            Self::RangeStart => "First Unit",
            Self::RangeEnd => "Last Unit",
            Self::ChargeType => "Charge Type",
            Self::CostPerBatch => "Amount",
            Self::MetricUnitsPerBatch => "Units",
            Self::BatchRoundingType => "Rounding Type",
        }
    }

    pub fn input(&self) -> FieldInput {
        match self {
            Self::ChargeType => FieldInput::Select {
                options: CHARGE_TYPE_OPTIONS,
            },
            Self::BatchRoundingType => FieldInput::Select {
                options: ROUNDING_OPTIONS,
            },
            Self::RangeStart | Self::RangeEnd | Self::CostPerBatch | Self::MetricUnitsPerBatch => {
                FieldInput::Number { min: Decimal::ZERO }
            }
        }
    }
}

impl std::fmt::Display for TierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `field` may be edited on a tier of type `tier_type`
pub fn is_field_editable(tier_type: &TierType, field: TierField) -> bool {
    match tier_type {
        TierType::Free => !matches!(
            field,
            TierField::CostPerBatch | TierField::MetricUnitsPerBatch | TierField::BatchRoundingType
        ),
        TierType::Flat => !matches!(
            field,
            TierField::MetricUnitsPerBatch | TierField::BatchRoundingType
        ),
        TierType::PerUnit | TierType::Unrecognized(_) => true,
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_type_roundtrips_known_codes() {
        assert_eq!(TierType::from("per_unit"), TierType::PerUnit);
        assert_eq!(String::from(TierType::Flat), "flat");
        assert_eq!(TierType::from("tiered"), TierType::Unrecognized("tiered".into()));
    }

    #[test]
    fn tier_deserializes_unknown_type_without_error() {
        let tier: Tier =
            serde_json::from_value(serde_json::json!({"type": "graduated", "range_start": 0}))
                .unwrap();
        assert_eq!(tier.tier_type, TierType::Unrecognized("graduated".into()));
        assert!(tier.is_open_ended());
    }

    #[test]
    fn tier_serializes_type_and_skips_missing_fields() {
        let tier = Tier::flat(Decimal::from(10), Decimal::from(5));
        let value = serde_json::to_value(&tier).unwrap();
        assert_eq!(value["type"], "flat");
        assert!(value.get("range_end").is_none());
        assert!(value.get("metric_units_per_batch").is_none());
    }

    #[test]
    fn normalize_free_forces_zero_cost_and_clears_units() {
        let mut tier = Tier::per_unit(
            Decimal::ZERO,
            Decimal::from(3),
            Decimal::from(10),
            BatchRoundingType::RoundUp,
        );
        tier.tier_type = TierType::Free;
        tier.normalize();
        assert_eq!(tier.cost_per_batch, Some(Decimal::ZERO));
        assert_eq!(tier.metric_units_per_batch, None);
    }

    #[test]
    fn normalize_flat_clears_units_keeps_cost() {
        let mut tier = Tier::per_unit(
            Decimal::ZERO,
            Decimal::from(3),
            Decimal::from(10),
            BatchRoundingType::RoundUp,
        );
        tier.tier_type = TierType::Flat;
        tier.normalize();
        assert_eq!(tier.cost_per_batch, Some(Decimal::from(3)));
        assert_eq!(tier.metric_units_per_batch, None);
    }

    #[test]
    fn patch_reports_touched_fields() {
        let patch = TierPatch {
            range_end: Some(None),
            cost_per_batch: Some(Decimal::ONE),
            ..Default::default()
        };
        assert_eq!(
            patch.fields(),
            vec![TierField::RangeEnd, TierField::CostPerBatch]
        );
        assert!(TierPatch::default().is_empty());
    }

    #[test]
    fn patch_can_clear_range_end() {
        let mut tier = Tier::free(Decimal::ZERO).with_range_end(Decimal::from(10));
        TierPatch {
            range_end: Some(None),
            ..Default::default()
        }
        .apply_to(&mut tier);
        assert!(tier.is_open_ended());
    }

    #[test]
    fn editability_follows_charge_type() {
        assert!(!is_field_editable(&TierType::Free, TierField::CostPerBatch));
        assert!(!is_field_editable(&TierType::Free, TierField::BatchRoundingType));
        assert!(is_field_editable(&TierType::Free, TierField::ChargeType));
        assert!(is_field_editable(&TierType::Flat, TierField::CostPerBatch));
        assert!(!is_field_editable(&TierType::Flat, TierField::MetricUnitsPerBatch));
        for field in TierField::ALL {
            assert!(is_field_editable(&TierType::PerUnit, field));
        }
    }

    #[test]
    fn field_inputs_are_keyed_by_role() {
        assert_eq!(
            TierField::ChargeType.input(),
            FieldInput::Select {
                options: &["per_unit", "free", "flat"]
            }
        );
        assert!(matches!(
            TierField::CostPerBatch.input(),
            FieldInput::Number { min } if min == Decimal::ZERO
        ));
        assert_eq!(TierField::BatchRoundingType.label(), "Rounding Type");
    }

    #[test]
    fn field_input_serializes_with_kind_tag() {
        let select = serde_json::to_value(TierField::BatchRoundingType.input()).unwrap();
        assert_eq!(select["kind"], "select");
        assert_eq!(select["options"][3], "no_rounding");

        let number = serde_json::to_value(TierField::RangeEnd.input()).unwrap();
        assert_eq!(number, serde_json::json!({"kind": "number", "min": 0.0}));
    }

    #[test]
    fn free_constructor_carries_zero_cost() {
        let tier = Tier::free(Decimal::from(4));
        assert_eq!(tier.cost_per_batch, Some(Decimal::ZERO));
        let mut normalized = tier.clone();
        normalized.normalize();
        assert_eq!(normalized, tier);
    }
}
