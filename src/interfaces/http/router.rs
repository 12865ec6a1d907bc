//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::SharedEditorRegistry;
use crate::domain::ports::MetricSource;
use crate::domain::tier::TierValidator;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::modules::{catalog, editor, health, metrics, tiers};

/// Shared handles every route group draws its state from
#[derive(Clone)]
pub struct ApiState {
    pub registry: SharedEditorRegistry,
    pub source: Arc<dyn MetricSource>,
    pub validator: TierValidator,
    pub started_at: Arc<Instant>,
}

impl ApiState {
    pub fn new(registry: SharedEditorRegistry, source: Arc<dyn MetricSource>) -> Self {
        Self {
            validator: registry.validator(),
            registry,
            source,
            started_at: Arc::new(Instant::now()),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Metrics
        catalog::list_metrics,
        catalog::proration_granularities,
        // Tiers
        tiers::validate_tiers,
        // Editor
        editor::open_session,
        editor::get_session,
        editor::close_session,
        editor::select_metric,
        editor::set_proration,
        editor::append_tier,
        editor::edit_tier,
        editor::delete_tier,
        editor::submit_session,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            catalog::MetricDto,
            catalog::FilterDto,
            tiers::TierDto,
            tiers::ValidateTiersRequest,
            tiers::TierCheckDto,
            tiers::TierValidationResponse,
            editor::UsageComponentDto,
            editor::OpenSessionRequest,
            editor::SelectMetricRequest,
            editor::SetProrationRequest,
            editor::TierPatchRequest,
            editor::TierRowDto,
            editor::ColumnDto,
            editor::SessionView,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Metrics", description = "Billable metric catalog"),
        (name = "Tiers", description = "Stateless tier ladder validation"),
        (name = "Editor", description = "Usage component editing sessions"),
    ),
    info(
        title = "Pricing Console API",
        version = "1.0.0",
        description = "Usage-based pricing components: metric selection, tier ladders and validation",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

pub fn create_api_router(state: ApiState, prometheus: PrometheusHandle) -> Router {
    let catalog_routes = Router::new()
        .route("/", get(catalog::list_metrics))
        .route(
            "/{metric_name}/proration-granularities",
            get(catalog::proration_granularities),
        )
        .with_state(catalog::CatalogState {
            source: state.source.clone(),
        });

    let tier_routes = Router::new()
        .route("/validate", post(tiers::validate_tiers))
        .with_state(tiers::TierState {
            validator: state.validator,
        });

    let editor_routes = Router::new()
        .route("/", post(editor::open_session))
        .route(
            "/{id}",
            get(editor::get_session).delete(editor::close_session),
        )
        .route("/{id}/metric", put(editor::select_metric))
        .route("/{id}/proration", put(editor::set_proration))
        .route("/{id}/tiers", post(editor::append_tier))
        .route(
            "/{id}/tiers/{range_start}",
            axum::routing::patch(editor::edit_tier).delete(editor::delete_tier),
        )
        .route("/{id}/submit", post(editor::submit_session))
        .with_state(editor::EditorState {
            registry: state.registry.clone(),
            source: state.source.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            registry: state.registry.clone(),
            started_at: state.started_at.clone(),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState { handle: prometheus });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/metrics", catalog_routes)
        .nest("/api/v1/tiers", tier_routes)
        .nest("/api/v1/editor/sessions", editor_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────
