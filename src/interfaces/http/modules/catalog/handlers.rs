//! Metric catalog handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::MetricDto;
use crate::domain::ports::MetricSource;
use crate::interfaces::http::common::{api_error, catalog_error, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct CatalogState {
    pub source: Arc<dyn MetricSource>,
}

#[utoipa::path(
    get,
    path = "/api/v1/metrics",
    tag = "Metrics",
    responses(
        (status = 200, description = "Metric catalog", body = ApiResponse<Vec<MetricDto>>),
        (status = 503, description = "Catalog source unavailable")
    )
)]
pub async fn list_metrics(State(state): State<CatalogState>) -> ApiResult<Vec<MetricDto>> {
    let metrics = state.source.list_metrics().await.map_err(catalog_error)?;
    Ok(Json(ApiResponse::success(
        metrics.iter().map(MetricDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/metrics/{metric_name}/proration-granularities",
    tag = "Metrics",
    params(("metric_name" = String, Path, description = "Metric name")),
    responses(
        (status = 200, description = "Granularities the metric can be prorated over", body = ApiResponse<Vec<String>>),
        (status = 404, description = "Unknown metric"),
        (status = 503, description = "Catalog source unavailable")
    )
)]
pub async fn proration_granularities(
    State(state): State<CatalogState>,
    Path(metric_name): Path<String>,
) -> ApiResult<Vec<String>> {
    let metrics = state.source.list_metrics().await.map_err(catalog_error)?;
    let metric = metrics
        .iter()
        .find(|m| m.metric_name == metric_name)
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Metric {} not found", metric_name),
            )
        })?;

    Ok(Json(ApiResponse::success(
        metric
            .proration_granularities()
            .into_iter()
            .map(|g| g.to_string())
            .collect(),
    )))
}
