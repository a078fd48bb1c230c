use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use internhub::workflows::internship::{
    marketplace_router, MarketplaceRepository, MarketplaceService, ProfileStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ServicePhase {
    Ready,
    Initializing,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadinessResponse {
    pub(crate) status: ServicePhase,
}

pub(crate) fn with_marketplace_routes<R, P>(
    service: Arc<MarketplaceService<R, P>>,
) -> axum::Router
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    marketplace_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let (status, phase) = if ready {
        (StatusCode::OK, ServicePhase::Ready)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ServicePhase::Initializing)
    };

    (status, Json(ReadinessResponse { status: phase }))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
