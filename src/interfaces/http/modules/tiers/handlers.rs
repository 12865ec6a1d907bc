//! Stateless tier validation

use axum::{extract::State, Json};
use tracing::debug;

use super::dto::{TierValidationResponse, ValidateTiersRequest};
use crate::domain::tier::{Tier, TierValidator};
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct TierState {
    /// Validator built from the configured range convention
    pub validator: TierValidator,
}

#[utoipa::path(
    post,
    path = "/api/v1/tiers/validate",
    tag = "Tiers",
    request_body = ValidateTiersRequest,
    responses(
        (status = 200, description = "Per-tier validation report", body = ApiResponse<TierValidationResponse>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Empty tier list")
    )
)]
pub async fn validate_tiers(
    State(state): State<TierState>,
    ValidatedJson(req): ValidatedJson<ValidateTiersRequest>,
) -> ApiResult<TierValidationResponse> {
    let validator = req
        .range_convention
        .map(TierValidator::new)
        .unwrap_or(state.validator);

    let tiers: Vec<Tier> = req.tiers.into_iter().map(Tier::from).collect();
    let report = validator.validate(&tiers);

    let result = if report.is_valid() { "valid" } else { "invalid" };
    metrics::counter!("tier_validations_total", "result" => result).increment(1);
    debug!(tiers = tiers.len(), result, convention = %validator.convention(), "Tiers validated");

    Ok(Json(ApiResponse::success(TierValidationResponse::new(
        report,
        validator.convention(),
    ))))
}
