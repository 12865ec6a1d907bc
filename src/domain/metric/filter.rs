//! Metric filters and their display form

use serde::{Deserialize, Serialize};

/// Comparison operator of a metric filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    IsIn,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNotIn,
}

impl FilterOperator {
    /// Parse a stored operator code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "eq" => Some(Self::Eq),
            "isin" => Some(Self::IsIn),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "isnotin" => Some(Self::IsNotIn),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::IsIn => "isin",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::IsNotIn => "isnotin",
        }
    }

    /// Human-readable token shown in tables
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::IsIn => "is",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::IsNotIn => "is not",
        }
    }
}

/// Right-hand side of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl std::fmt::Display for ComparisonValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// A numeric or categorical filter as stored on a metric.
///
/// The operator is kept as its raw code so unknown codes survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub property_name: String,
    pub operator: String,
    pub comparison_value: ComparisonValue,
}

impl Filter {
    pub fn new(
        property_name: impl Into<String>,
        operator: FilterOperator,
        comparison_value: ComparisonValue,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            operator: operator.code().to_string(),
            comparison_value,
        }
    }

    pub fn parsed_operator(&self) -> Option<FilterOperator> {
        FilterOperator::from_code(&self.operator)
    }

    fn to_display(&self) -> DisplayFilter {
        DisplayFilter {
            property_name: self.property_name.clone(),
            operator: self.parsed_operator().map(|op| op.symbol()),
            comparison_value: self.comparison_value.clone(),
        }
    }
}

/// A filter with its operator rewritten for display; `None` for unmapped codes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFilter {
    pub property_name: String,
    pub operator: Option<&'static str>,
    pub comparison_value: ComparisonValue,
}

impl std::fmt::Display for DisplayFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.operator {
            Some(op) => write!(f, "{} {} \"{}\"", self.property_name, op, self.comparison_value),
            None => write!(f, "{} \"{}\"", self.property_name, self.comparison_value),
        }
    }
}

/// Combine a metric's numeric and categorical filters into one display list.
///
/// Numeric filters come first. Returns `None` only when both lists are absent.
pub fn merge_filters(
    numeric: Option<&[Filter]>,
    categorical: Option<&[Filter]>,
) -> Option<Vec<DisplayFilter>> {
    if numeric.is_none() && categorical.is_none() {
        return None;
    }

    Some(
        numeric
            .into_iter()
            .chain(categorical)
            .flatten()
            .map(Filter::to_display)
            .collect(),
    )
}

// ── Tests ──────────────────────────────────────────────────────
