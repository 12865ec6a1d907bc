//! Table rendering of tiers

use serde::Serialize;

use super::model::{Tier, TierType};

const UNBOUNDED: &str = "∞";
const NOT_APPLICABLE: &str = "-";

/// One rendered tier row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierRow {
    pub range_start: String,
    pub range_end: String,
    pub charge_type: String,
    pub cost_per_batch: String,
    pub metric_units_per_batch: String,
    pub batch_rounding_type: String,
    pub deletable: bool,
}

impl TierRow {
    /// Render `tier`; `deletable` is decided by the owner of the ladder
    pub fn render(tier: &Tier, deletable: bool) -> Self {
        let batched = !matches!(tier.tier_type, TierType::Flat | TierType::Free);

        Self {
            range_start: tier.range_start.normalize().to_string(),
            range_end: tier
                .range_end
                .map(|e| e.normalize().to_string())
                .unwrap_or_else(|| UNBOUNDED.to_string()),
            charge_type: tier.tier_type.to_string(),
            cost_per_batch: tier
                .cost_per_batch
                .map(|c| c.normalize().to_string())
                .unwrap_or_default(),
            metric_units_per_batch: if batched {
                tier.metric_units_per_batch
                    .map(|u| u.normalize().to_string())
                    .unwrap_or_default()
            } else {
                NOT_APPLICABLE.to_string()
            },
            batch_rounding_type: if batched {
                tier.batch_rounding_type
                    .map(|r| r.to_string())
                    .unwrap_or_default()
            } else {
                NOT_APPLICABLE.to_string()
            },
            deletable,
        }
    }
}

pub fn render_rows(tiers: &[Tier], deletable: impl Fn(&Tier) -> bool) -> Vec<TierRow> {
    tiers.iter().map(|t| TierRow::render(t, deletable(t))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tier::BatchRoundingType;
    use rust_decimal::Decimal;

    #[test]
    fn open_end_renders_as_infinity() {
        let row = TierRow::render(&Tier::free(Decimal::ZERO), false);
        assert_eq!(row.range_end, "∞");
        assert_eq!(row.cost_per_batch, "0");
        assert_eq!(row.metric_units_per_batch, "-");
        assert_eq!(row.batch_rounding_type, "-");
        assert!(!row.deletable);
    }

    #[test]
    fn per_unit_row_shows_batch_fields() {
        let tiers = vec![
            Tier::free(Decimal::ZERO).with_range_end(Decimal::from(100)),
            Tier::per_unit(
                Decimal::from(100),
                Decimal::new(250, 2),
                Decimal::from(10),
                BatchRoundingType::RoundDown,
            ),
        ];
        let rows = render_rows(&tiers, |t| !t.range_start.is_zero());
        assert_eq!(rows[0].range_end, "100");
        assert!(!rows[0].deletable);
        assert_eq!(rows[1].cost_per_batch, "2.5");
        assert_eq!(rows[1].metric_units_per_batch, "10");
        assert_eq!(rows[1].batch_rounding_type, "round_down");
        assert!(rows[1].deletable);
    }
}
