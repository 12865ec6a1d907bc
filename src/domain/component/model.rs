//! Usage-based pricing component

use serde::{Deserialize, Serialize};

use crate::domain::metric::Granularity;
use crate::domain::tier::Tier;

/// Billing period of the plan a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanDuration {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PlanDuration {
    /// Singular period name
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Monthly => "month",
            Self::Quarterly => "quarter",
            Self::Yearly => "year",
        }
    }
}

impl std::fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

/// A finalized usage component, handed to the caller for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageComponent {
    /// Metric name
    pub metric: String,
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub proration_granularity: Granularity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn component_defaults_proration_to_total() {
        let c: UsageComponent = serde_json::from_value(serde_json::json!({
            "metric": "api_calls",
            "tiers": [{"type": "free", "range_start": 0}]
        }))
        .unwrap();
        assert_eq!(c.proration_granularity, Granularity::Total);
        assert_eq!(c.tiers, vec![Tier::free(Decimal::ZERO)]);
        assert_eq!(c.metric_id, None);
    }

    #[test]
    fn plan_duration_units() {
        assert_eq!(PlanDuration::Monthly.unit(), "month");
        assert_eq!(PlanDuration::Quarterly.unit(), "quarter");
        assert_eq!(PlanDuration::Yearly.unit(), "year");
    }
}
