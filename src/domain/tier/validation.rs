//! Tier ladder validation
//!
//! A ladder is valid when its tiers partition the usage axis from zero with no
//! gaps or overlaps, only the last tier is open-ended, and every tier carries
//! the fields its charge type needs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{Tier, TierType};

pub const RANGE_INVALID_FIRST: &str = "Range is not valid";
pub const RANGE_INVALID: &str = "Range is not valid.";
pub const TIERS_INVALID: &str = "Tiers are not valid";
pub const UNIT_INVALID: &str = "Unit is not valid.";

/// How consecutive tier boundaries touch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeConvention {
    /// `[start, end)`: the next tier starts exactly at the previous end
    #[default]
    HalfOpen,
    /// `[start, end]` on integer units: the next tier starts at previous end + 1
    Closed,
    /// Accepts either of the above
    Lenient,
}

impl RangeConvention {
    pub fn is_adjacent(self, previous_end: Decimal, range_start: Decimal) -> bool {
        let exact = || range_start == previous_end;
        let stepped = || previous_end.checked_add(Decimal::ONE) == Some(range_start);
        match self {
            Self::HalfOpen => exact(),
            Self::Closed => stepped(),
            Self::Lenient => exact() || stepped(),
        }
    }

    /// Where a tier appended after `previous_end` begins.
    ///
    /// `None` when the closed step would overflow the decimal range.
    pub fn next_start(self, previous_end: Decimal) -> Option<Decimal> {
        match self {
            Self::HalfOpen | Self::Lenient => Some(previous_end),
            Self::Closed => previous_end.checked_add(Decimal::ONE),
        }
    }
}

impl std::fmt::Display for RangeConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfOpen => write!(f, "half_open"),
            Self::Closed => write!(f, "closed"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

/// Validation outcome for a single tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCheck {
    pub is_valid: bool,
    pub message: String,
}

impl TierCheck {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Per-tier results, in ladder order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierReport {
    checks: Vec<TierCheck>,
}

impl TierReport {
    pub fn checks(&self) -> &[TierCheck] {
        &self.checks
    }

    pub fn into_checks(self) -> Vec<TierCheck> {
        self.checks
    }

    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.is_valid)
    }

    /// Message of the first invalid tier, as reported (possibly empty)
    pub fn first_error(&self) -> Option<&str> {
        self.checks
            .iter()
            .find(|c| !c.is_valid)
            .map(|c| c.message.as_str())
    }

    /// Text shown while saving is blocked; never empty when the report is invalid
    pub fn blocking_message(&self) -> Option<String> {
        self.first_error().map(|msg| {
            if msg.is_empty() {
                TIERS_INVALID.to_string()
            } else {
                msg.to_string()
            }
        })
    }

    /// Index of the first invalid tier
    pub fn first_invalid_index(&self) -> Option<usize> {
        self.checks.iter().position(|c| !c.is_valid)
    }
}

/// Validates tier ladders under one range convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierValidator {
    convention: RangeConvention,
}

impl TierValidator {
    pub fn new(convention: RangeConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> RangeConvention {
        self.convention
    }

    pub fn validate(&self, tiers: &[Tier]) -> TierReport {
        let mut current_end: Option<Decimal> = None;

        let checks = tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| {
                let range_ok = if index == 0 {
                    first_range_ok(tier)
                } else {
                    self.next_range_ok(current_end, tier)
                };
                // Later tiers are checked against the last seen bound even
                // when this one is itself invalid.
                current_end = tier.range_end;

                if !range_ok {
                    let message = if index == 0 {
                        RANGE_INVALID_FIRST
                    } else {
                        RANGE_INVALID
                    };
                    return TierCheck::invalid(message);
                }
                check_fields(tier)
            })
            .collect();

        TierReport { checks }
    }

    fn next_range_ok(&self, previous_end: Option<Decimal>, tier: &Tier) -> bool {
        let Some(previous_end) = previous_end else {
            // an earlier tier claimed "unbounded" yet more tiers follow
            return false;
        };
        self.convention.is_adjacent(previous_end, tier.range_start) && bounds_ordered(tier)
    }
}

/// Validate with the default half-open convention
pub fn validate_tiers(tiers: &[Tier]) -> TierReport {
    TierValidator::default().validate(tiers)
}

fn first_range_ok(tier: &Tier) -> bool {
    tier.range_start == Decimal::ZERO && bounds_ordered(tier)
}

fn bounds_ordered(tier: &Tier) -> bool {
    match tier.range_end {
        Some(end) => tier.range_start < end,
        None => true,
    }
}

fn check_fields(tier: &Tier) -> TierCheck {
    match tier.tier_type {
        TierType::Unrecognized(_) => TierCheck::invalid(TIERS_INVALID),
        TierType::PerUnit => {
            let cost_ok = tier.cost_per_batch.is_some_and(|c| c >= Decimal::ZERO);
            let units_ok = tier
                .metric_units_per_batch
                .is_some_and(|u| u > Decimal::ZERO);
            if tier.batch_rounding_type.is_some() && cost_ok && units_ok {
                TierCheck::valid()
            } else {
                TierCheck::invalid(UNIT_INVALID)
            }
        }
        TierType::Flat => {
            if tier.cost_per_batch.is_some_and(|c| c >= Decimal::ZERO) {
                TierCheck::valid()
            } else {
                TierCheck::invalid("")
            }
        }
        TierType::Free => TierCheck::valid(),
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tier::model::BatchRoundingType;
    use proptest::prelude::*;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn ladder() -> Vec<Tier> {
        vec![
            Tier::free(d(0)).with_range_end(d(10)),
            Tier::per_unit(d(10), d(2), d(1), BatchRoundingType::RoundUp),
        ]
    }

    #[test]
    fn single_free_tier_from_zero_is_valid() {
        let report = validate_tiers(&[Tier::free(d(0))]);
        assert!(report.is_valid());
        assert_eq!(report.checks().len(), 1);
        assert_eq!(report.first_error(), None);
    }

    #[test]
    fn empty_ladder_is_trivially_valid() {
        let report = validate_tiers(&[]);
        assert!(report.is_valid());
        assert!(report.checks().is_empty());
    }

    #[test]
    fn first_tier_must_start_at_zero() {
        let report = validate_tiers(&[Tier::free(d(5))]);
        assert!(!report.is_valid());
        assert_eq!(report.first_error(), Some(RANGE_INVALID_FIRST));
    }

    #[test]
    fn first_tier_with_inverted_bounds_is_invalid() {
        let report = validate_tiers(&[Tier::free(d(0)).with_range_end(d(0))]);
        assert_eq!(report.first_error(), Some(RANGE_INVALID_FIRST));
    }

    #[test]
    fn touching_tiers_are_valid() {
        let report = validate_tiers(&ladder());
        assert!(report.is_valid());
        assert_eq!(report.checks(), &[TierCheck::valid(), TierCheck::valid()]);
    }

    #[test]
    fn gap_of_one_is_invalid_under_half_open() {
        let mut tiers = ladder();
        tiers[1].range_start = d(11);
        let report = validate_tiers(&tiers);
        assert!(report.checks()[0].is_valid);
        assert_eq!(report.checks()[1], TierCheck::invalid(RANGE_INVALID));
    }

    #[test]
    fn closed_convention_requires_step_of_one() {
        let validator = TierValidator::new(RangeConvention::Closed);
        let mut tiers = ladder();
        assert!(!validator.validate(&tiers).is_valid());
        tiers[1].range_start = d(11);
        assert!(validator.validate(&tiers).is_valid());
    }

    #[test]
    fn lenient_convention_accepts_both_touching_styles() {
        let validator = TierValidator::new(RangeConvention::Lenient);
        let mut tiers = ladder();
        assert!(validator.validate(&tiers).is_valid());
        tiers[1].range_start = d(11);
        assert!(validator.validate(&tiers).is_valid());
        tiers[1].range_start = d(12);
        assert!(!validator.validate(&tiers).is_valid());
    }

    #[test]
    fn overlap_is_invalid() {
        let mut tiers = ladder();
        tiers[1].range_start = d(9);
        assert_eq!(validate_tiers(&tiers).first_error(), Some(RANGE_INVALID));
    }

    #[test]
    fn open_ended_tier_followed_by_another_is_invalid() {
        let tiers = vec![Tier::free(d(0)), Tier::flat(d(10), d(1))];
        let report = validate_tiers(&tiers);
        assert!(report.checks()[0].is_valid);
        assert_eq!(report.checks()[1].message, RANGE_INVALID);
    }

    #[test]
    fn scan_continues_from_last_seen_bounds() {
        // the middle tier is invalid, but the third is checked against its end
        let tiers = vec![
            Tier::free(d(0)).with_range_end(d(10)),
            Tier::flat(d(12), d(1)).with_range_end(d(20)),
            Tier::flat(d(20), d(1)),
        ];
        let report = validate_tiers(&tiers);
        assert!(!report.checks()[1].is_valid);
        assert!(report.checks()[2].is_valid);
        assert_eq!(report.first_invalid_index(), Some(1));
    }

    #[test]
    fn unknown_type_is_reported() {
        let mut tier = Tier::free(d(0));
        tier.tier_type = TierType::from("volume");
        assert_eq!(validate_tiers(&[tier]).first_error(), Some(TIERS_INVALID));
    }

    #[test]
    fn per_unit_requires_every_field() {
        let base = Tier::per_unit(d(0), d(2), d(1), BatchRoundingType::RoundNearest);
        assert!(validate_tiers(&[base.clone()]).is_valid());

        let mut no_rounding = base.clone();
        no_rounding.batch_rounding_type = None;
        let mut no_cost = base.clone();
        no_cost.cost_per_batch = None;
        let mut no_units = base.clone();
        no_units.metric_units_per_batch = None;
        let mut zero_units = base.clone();
        zero_units.metric_units_per_batch = Some(d(0));
        let mut negative_cost = base;
        negative_cost.cost_per_batch = Some(d(-1));

        for tier in [no_rounding, no_cost, no_units, zero_units, negative_cost] {
            assert_eq!(validate_tiers(&[tier]).first_error(), Some(UNIT_INVALID));
        }
    }

    #[test]
    fn per_unit_rules_apply_after_the_first_tier() {
        let mut tiers = ladder();
        tiers[1].batch_rounding_type = None;
        assert_eq!(validate_tiers(&tiers).first_error(), Some(UNIT_INVALID));
    }

    #[test]
    fn flat_without_cost_is_invalid_with_empty_message() {
        let mut tier = Tier::flat(d(0), d(1));
        tier.cost_per_batch = None;
        let report = validate_tiers(&[tier]);
        assert!(!report.is_valid());
        assert_eq!(report.first_error(), Some(""));
        assert_eq!(report.blocking_message().as_deref(), Some(TIERS_INVALID));
    }

    #[test]
    fn free_tier_skips_field_checks() {
        let mut tier = Tier::free(d(0));
        tier.cost_per_batch = Some(d(-3));
        assert!(validate_tiers(&[tier]).is_valid());
    }

    #[test]
    fn next_start_follows_convention() {
        assert_eq!(RangeConvention::HalfOpen.next_start(d(10)), Some(d(10)));
        assert_eq!(RangeConvention::Lenient.next_start(d(10)), Some(d(10)));
        assert_eq!(RangeConvention::Closed.next_start(d(10)), Some(d(11)));
        assert_eq!(RangeConvention::Closed.next_start(Decimal::MAX), None);
        assert_eq!(RangeConvention::HalfOpen.next_start(Decimal::MAX), Some(Decimal::MAX));
    }

    #[test]
    fn boundary_at_decimal_max_does_not_overflow() {
        let tiers = vec![
            Tier::free(d(0)).with_range_end(Decimal::MAX),
            Tier::flat(Decimal::MAX, d(1)),
        ];
        assert!(validate_tiers(&tiers).is_valid());
        assert!(TierValidator::new(RangeConvention::Lenient).validate(&tiers).is_valid());

        let report = TierValidator::new(RangeConvention::Closed).validate(&tiers);
        assert_eq!(report.checks()[1].message, RANGE_INVALID);
    }

    #[test]
    fn convention_parses_from_snake_case() {
        let c: RangeConvention = serde_json::from_str("\"lenient\"").unwrap();
        assert_eq!(c, RangeConvention::Lenient);
        assert_eq!(RangeConvention::default().to_string(), "half_open");
    }

    fn contiguous_ladder() -> impl Strategy<Value = Vec<Tier>> {
        prop::collection::vec(1i64..1_000, 0..8).prop_map(|widths| {
            let mut start = 0i64;
            let mut tiers = Vec::new();
            for w in widths {
                tiers.push(Tier::flat(d(start), d(1)).with_range_end(d(start + w)));
                start += w;
            }
            tiers.push(Tier::free(d(start)));
            tiers
        })
    }

    proptest! {
        #[test]
        fn contiguous_ladders_are_valid(tiers in contiguous_ladder()) {
            prop_assert!(validate_tiers(&tiers).is_valid());
        }

        #[test]
        fn nonzero_first_start_is_invalid(tiers in contiguous_ladder(), shift in 1i64..50) {
            let mut tiers = tiers;
            tiers[0].range_start = d(shift);
            let report = validate_tiers(&tiers);
            prop_assert_eq!(report.checks()[0].message.as_str(), RANGE_INVALID_FIRST);
        }

        #[test]
        fn misaligned_start_is_invalid_for_every_convention(
            tiers in contiguous_ladder(),
            pick in any::<prop::sample::Index>(),
            offset in prop_oneof![-50i64..0, 2i64..50],
        ) {
            prop_assume!(tiers.len() > 1);
            let i = 1 + pick.index(tiers.len() - 1);
            let mut tiers = tiers;
            let previous_end = tiers[i - 1].range_end.unwrap();
            tiers[i].range_start = previous_end + d(offset);
            for convention in [RangeConvention::HalfOpen, RangeConvention::Closed, RangeConvention::Lenient] {
                let report = TierValidator::new(convention).validate(&tiers);
                prop_assert!(!report.checks()[i].is_valid);
            }
        }
    }
}
