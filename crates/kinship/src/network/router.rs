use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NodeId, TargetDescriptor};
use super::service::{NetworkService, NetworkServiceError, NetworkStore};
use crate::health::UserId;

/// Body accepted by the path endpoint.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub all: bool,
}

/// Router builder exposing statistics, path, and introduction lookups.
pub fn network_router<S>(service: Arc<NetworkService<S>>) -> Router
where
    S: NetworkStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/network/stats",
            get(stats_handler::<S>),
        )
        .route(
            "/api/v1/users/:user_id/network/paths",
            post(paths_handler::<S>),
        )
        .route(
            "/api/v1/users/:user_id/network/introductions",
            post(introduction_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<NetworkService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: NetworkStore + 'static,
{
    let user_id = match UserId::parse(&user_id) {
        Ok(id) => id,
        Err(err) => return error_response(err.into()),
    };

    match service.stats(&user_id).await {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn paths_handler<S>(
    State(service): State<Arc<NetworkService<S>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<PathRequest>,
) -> Response
where
    S: NetworkStore + 'static,
{
    let user_id = match UserId::parse(&user_id) {
        Ok(id) => id,
        Err(err) => return error_response(err.into()),
    };

    match service
        .paths(&user_id, &request.from, &request.to, request.all)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn introduction_handler<S>(
    State(service): State<Arc<NetworkService<S>>>,
    Path(user_id): Path<String>,
    axum::Json(target): axum::Json<TargetDescriptor>,
) -> Response
where
    S: NetworkStore + 'static,
{
    let user_id = match UserId::parse(&user_id) {
        Ok(id) => id,
        Err(err) => return error_response(err.into()),
    };

    match service.path_to_target(&user_id, &target).await {
        Ok(lookup) => (StatusCode::OK, axum::Json(lookup)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: NetworkServiceError) -> Response {
    let status = match &err {
        NetworkServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        NetworkServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
