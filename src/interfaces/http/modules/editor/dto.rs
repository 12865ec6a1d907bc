//! Editor session DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::application::EditorSession;
use crate::domain::component::{PlanDuration, UsageComponent};
use crate::domain::metric::Granularity;
use crate::domain::tier::{
    is_field_editable, BatchRoundingType, FieldInput, TierField, TierPatch, TierRow,
};
use crate::interfaces::http::modules::tiers::TierDto;

/// A usage component as handed in for editing or returned on submit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageComponentDto {
    pub metric: String,
    pub tiers: Vec<TierDto>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub proration_granularity: Granularity,
    #[serde(default)]
    pub metric_id: Option<String>,
}

impl From<UsageComponent> for UsageComponentDto {
    fn from(c: UsageComponent) -> Self {
        Self {
            metric: c.metric,
            tiers: c.tiers.into_iter().map(TierDto::from).collect(),
            proration_granularity: c.proration_granularity,
            metric_id: c.metric_id,
        }
    }
}

impl From<UsageComponentDto> for UsageComponent {
    fn from(d: UsageComponentDto) -> Self {
        Self {
            metric: d.metric,
            tiers: d.tiers.into_iter().map(Into::into).collect(),
            proration_granularity: d.proration_granularity,
            metric_id: d.metric_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    /// Saved component to edit; omit to create a new one
    #[serde(default)]
    pub existing: Option<UsageComponentDto>,
    /// `monthly`, `quarterly` or `yearly`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub plan_duration: Option<PlanDuration>,
}

impl Validate for OpenSessionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(existing) = &self.existing {
            if existing.metric.trim().is_empty() {
                errors.add("existing.metric", rule("required", "metric is required"));
            }
        }
        into_result(errors)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SelectMetricRequest {
    #[validate(length(min = 1, message = "metric_name is required"))]
    pub metric_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetProrationRequest {
    /// `seconds`, `minutes`, `hours`, `days`, `months` or `total`
    #[schema(value_type = String)]
    pub granularity: Granularity,
}

/// Partial tier update. Omitted fields are left alone; `range_end: null`
/// makes the tier open-ended.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TierPatchRequest {
    #[serde(rename = "type", default)]
    pub tier_type: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub range_start: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub range_end: Option<Option<Decimal>>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub cost_per_batch: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub metric_units_per_batch: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub batch_rounding_type: Option<BatchRoundingType>,
}

/// Distinguishes an explicit `null` from an absent field
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Some)
}

impl Validate for TierPatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let numbers = [
            ("range_start", self.range_start),
            ("range_end", self.range_end.flatten()),
            ("cost_per_batch", self.cost_per_batch),
            ("metric_units_per_batch", self.metric_units_per_batch),
        ];
        for (field, value) in numbers {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                errors.add(field, rule("range", "must not be negative"));
            }
        }
        if self.tier_type.is_none()
            && self.range_start.is_none()
            && self.range_end.is_none()
            && self.cost_per_batch.is_none()
            && self.metric_units_per_batch.is_none()
            && self.batch_rounding_type.is_none()
        {
            errors.add("patch", rule("empty", "at least one field is required"));
        }
        into_result(errors)
    }
}

impl From<TierPatchRequest> for TierPatch {
    fn from(r: TierPatchRequest) -> Self {
        Self {
            tier_type: r.tier_type.map(Into::into),
            range_start: r.range_start,
            range_end: r.range_end,
            cost_per_batch: r.cost_per_batch,
            metric_units_per_batch: r.metric_units_per_batch,
            batch_rounding_type: r.batch_rounding_type,
        }
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A tier rendered as a table row
#[derive(Debug, Serialize, ToSchema)]
pub struct TierRowDto {
    pub range_start: String,
    /// `∞` when open-ended
    pub range_end: String,
    pub charge_type: String,
    pub cost_per_batch: String,
    /// `-` for flat and free tiers
    pub metric_units_per_batch: String,
    pub batch_rounding_type: String,
    pub deletable: bool,
    /// Columns the row's charge type lets the user edit
    pub editable_fields: Vec<String>,
}

impl TierRowDto {
    fn new(row: TierRow, editable_fields: Vec<String>) -> Self {
        Self {
            range_start: row.range_start,
            range_end: row.range_end,
            charge_type: row.charge_type,
            cost_per_batch: row.cost_per_batch,
            metric_units_per_batch: row.metric_units_per_batch,
            batch_rounding_type: row.batch_rounding_type,
            deletable: row.deletable,
            editable_fields,
        }
    }
}

/// Header of one editable tier column and the input it takes
#[derive(Debug, Serialize, ToSchema)]
pub struct ColumnDto {
    /// Tier JSON key the column edits
    pub key: String,
    pub label: String,
    /// `select` or `number`
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub min: Option<Decimal>,
}

impl From<TierField> for ColumnDto {
    fn from(field: TierField) -> Self {
        let (kind, options, min) = match field.input() {
            FieldInput::Select { options } => (
                "select",
                options.iter().map(|o| o.to_string()).collect(),
                None,
            ),
            FieldInput::Number { min } => ("number", Vec::new(), Some(min)),
        };
        Self {
            key: field_key(field).to_string(),
            label: field.label().to_string(),
            kind: kind.to_string(),
            options,
            min,
        }
    }
}

/// Current state of an editor session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    pub metric: Option<String>,
    /// Names offered for selection
    pub metric_names: Vec<String>,
    pub metric_gauge: bool,
    pub gauge_granularity: Option<String>,
    pub price_hint: Option<String>,
    pub plan_duration: String,
    pub proration_granularity: String,
    pub valid_proration_granularities: Vec<String>,
    pub tiers: Vec<TierDto>,
    /// Table columns in display order
    pub columns: Vec<ColumnDto>,
    pub rows: Vec<TierRowDto>,
    /// Message blocking submission, if any
    pub error: Option<String>,
    pub can_submit: bool,
    pub opened_at: DateTime<Utc>,
    pub last_touched: DateTime<Utc>,
}

impl SessionView {
    pub fn new(session_id: Uuid, session: &EditorSession) -> Self {
        let editor = &session.editor;
        let tiers = editor.tiers().tiers();

        let rows = tiers
            .iter()
            .zip(editor.tiers().rows())
            .map(|(tier, row)| {
                let editable = TierField::ALL
                    .into_iter()
                    .filter(|f| is_field_editable(&tier.tier_type, *f))
                    .map(|f| field_key(f).to_string())
                    .collect();
                TierRowDto::new(row, editable)
            })
            .collect();

        Self {
            session_id,
            metric: editor.metric().map(str::to_string),
            metric_names: editor.snapshot().metric_names().to_vec(),
            metric_gauge: editor.is_gauge(),
            gauge_granularity: editor.gauge_granularity().map(|g| g.to_string()),
            price_hint: editor.price_hint(),
            plan_duration: editor.plan_duration().to_string(),
            proration_granularity: editor.proration_granularity().to_string(),
            valid_proration_granularities: editor
                .valid_proration_granularities()
                .into_iter()
                .map(|g| g.to_string())
                .collect(),
            tiers: tiers.iter().cloned().map(TierDto::from).collect(),
            columns: TierField::ALL.into_iter().map(ColumnDto::from).collect(),
            rows,
            error: editor.tiers().error_message().map(str::to_string),
            can_submit: editor.metric().is_some() && editor.tiers().can_submit(),
            opened_at: session.opened_at,
            last_touched: session.last_touched,
        }
    }
}

/// Wire name of a tier column, matching the tier JSON keys
fn field_key(field: TierField) -> &'static str {
    match field {
        TierField::RangeStart => "range_start",
        TierField::RangeEnd => "range_end",
        TierField::ChargeType => "type",
        TierField::CostPerBatch => "cost_per_batch",
        TierField::MetricUnitsPerBatch => "metric_units_per_batch",
        TierField::BatchRoundingType => "batch_rounding_type",
    }
}
