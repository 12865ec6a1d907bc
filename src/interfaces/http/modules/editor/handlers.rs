//! Editor session handlers

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::dto::{
    OpenSessionRequest, SelectMetricRequest, SessionView, SetProrationRequest, TierPatchRequest,
    UsageComponentDto,
};
use crate::application::{ComponentEditor, MetricSnapshot, SharedEditorRegistry};
use crate::domain::component::UsageComponent;
use crate::domain::ports::MetricSource;
use crate::interfaces::http::common::{
    api_error, catalog_error, editor_error, session_not_found, ApiError, ApiResponse, ApiResult,
    EmptyData, ValidatedJson,
};
use crate::shared::errors::EditorError;

#[derive(Clone)]
pub struct EditorState {
    pub registry: SharedEditorRegistry,
    pub source: Arc<dyn MetricSource>,
}

fn view(state: &EditorState, id: Uuid) -> ApiResult<SessionView> {
    let session = state.registry.get(id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(ApiResponse::success(SessionView::new(id, &session))))
}

/// Apply `op` under the session lock and return the updated view
fn mutate<F>(state: &EditorState, id: Uuid, op: F) -> ApiResult<SessionView>
where
    F: FnOnce(&mut ComponentEditor) -> Result<(), EditorError>,
{
    state
        .registry
        .with_session(id, op)
        .ok_or_else(|| session_not_found(id))?
        .map_err(editor_error)?;
    view(state, id)
}

fn parse_range_start(raw: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(raw).map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid range start: {}", raw),
        )
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/editor/sessions",
    tag = "Editor",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = ApiResponse<SessionView>),
        (status = 422, description = "Invalid request"),
        (status = 503, description = "Catalog source unavailable")
    )
)]
pub async fn open_session(
    State(state): State<EditorState>,
    ValidatedJson(req): ValidatedJson<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionView>>), ApiError> {
    let existing: Option<UsageComponent> = req.existing.map(Into::into);
    let editing_metric = existing.as_ref().map(|c| c.metric.as_str());

    let snapshot = MetricSnapshot::load(state.source.as_ref(), editing_metric)
        .await
        .map_err(catalog_error)?;

    let id = state.registry.open(
        Arc::new(snapshot),
        existing,
        req.plan_duration.unwrap_or_default(),
    );
    let Json(body) = view(&state, id)?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/editor/sessions/{id}",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    view(&state, id)
}

#[utoipa::path(
    delete,
    path = "/api/v1/editor/sessions/{id}",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session cancelled", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn close_session(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
) -> ApiResult<EmptyData> {
    if state.registry.close(id) {
        Ok(Json(ApiResponse::success(EmptyData {})))
    } else {
        Err(session_not_found(id))
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/editor/sessions/{id}/metric",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SelectMetricRequest,
    responses(
        (status = 200, description = "Metric selected", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Unknown metric")
    )
)]
pub async fn select_metric(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SelectMetricRequest>,
) -> ApiResult<SessionView> {
    mutate(&state, id, |editor| editor.select_metric(&req.metric_name))
}

#[utoipa::path(
    put,
    path = "/api/v1/editor/sessions/{id}/proration",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SetProrationRequest,
    responses(
        (status = 200, description = "Proration granularity set", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Granularity not available for the metric")
    )
)]
pub async fn set_proration(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SetProrationRequest>,
) -> ApiResult<SessionView> {
    mutate(&state, id, |editor| {
        editor.set_proration_granularity(req.granularity)
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/editor/sessions/{id}/tiers",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Tier appended", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Last tier has no range end")
    )
)]
pub async fn append_tier(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    mutate(&state, id, |editor| editor.tiers_mut().append())
}

#[utoipa::path(
    patch,
    path = "/api/v1/editor/sessions/{id}/tiers/{range_start}",
    tag = "Editor",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("range_start" = String, Path, description = "Range start of the tier to edit")
    ),
    request_body = TierPatchRequest,
    responses(
        (status = 200, description = "Tier edited", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session or tier"),
        (status = 422, description = "Field not editable or invalid value")
    )
)]
pub async fn edit_tier(
    State(state): State<EditorState>,
    Path((id, range_start)): Path<(Uuid, String)>,
    ValidatedJson(req): ValidatedJson<TierPatchRequest>,
) -> ApiResult<SessionView> {
    let range_start = parse_range_start(&range_start)?;
    mutate(&state, id, |editor| {
        editor.tiers_mut().edit(range_start, req.into())
    })
}

#[utoipa::path(
    delete,
    path = "/api/v1/editor/sessions/{id}/tiers/{range_start}",
    tag = "Editor",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("range_start" = String, Path, description = "Range start of the tier to delete")
    ),
    responses(
        (status = 200, description = "Tier deleted", body = ApiResponse<SessionView>),
        (status = 404, description = "Unknown session or tier"),
        (status = 422, description = "First or only tier")
    )
)]
pub async fn delete_tier(
    State(state): State<EditorState>,
    Path((id, range_start)): Path<(Uuid, String)>,
) -> ApiResult<SessionView> {
    let range_start = parse_range_start(&range_start)?;
    mutate(&state, id, |editor| editor.tiers_mut().delete(range_start))
}

#[utoipa::path(
    post,
    path = "/api/v1/editor/sessions/{id}/submit",
    tag = "Editor",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Finalized usage component", body = ApiResponse<UsageComponentDto>),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "No metric selected or tiers invalid")
    )
)]
pub async fn submit_session(
    State(state): State<EditorState>,
    Path(id): Path<Uuid>,
) -> ApiResult<UsageComponentDto> {
    let component = state
        .registry
        .submit(id)
        .ok_or_else(|| session_not_found(id))?
        .map_err(editor_error)?;
    Ok(Json(ApiResponse::success(component.into())))
}
