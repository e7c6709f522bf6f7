use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContactId, UserId};
use super::repository::{AlertPublisher, HealthRecordStore, StoreError};
use super::service::{HealthScoringService, HealthServiceError};

/// Body accepted by the manual override endpoint.
#[derive(Debug, Deserialize)]
pub struct ScoreOverrideRequest {
    pub score: f64,
}

/// Router builder exposing refresh, interaction, and override endpoints.
pub fn health_router<S, A>(service: Arc<HealthScoringService<S, A>>) -> Router
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/health/refresh",
            post(refresh_handler::<S, A>),
        )
        .route(
            "/api/v1/users/:user_id/contacts/:contact_id/interactions",
            post(interaction_handler::<S, A>),
        )
        .route(
            "/api/v1/users/:user_id/contacts/:contact_id/health",
            put(override_handler::<S, A>),
        )
        .with_state(service)
}

pub(crate) async fn refresh_handler<S, A>(
    State(service): State<Arc<HealthScoringService<S, A>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    let user_id = match UserId::parse(&user_id) {
        Ok(id) => id,
        Err(err) => return error_response(err.into()),
    };

    match service.refresh(&user_id, Utc::now()).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn interaction_handler<S, A>(
    State(service): State<Arc<HealthScoringService<S, A>>>,
    Path((user_id, contact_id)): Path<(String, String)>,
) -> Response
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    let (user_id, contact_id) = match parse_ids(&user_id, &contact_id) {
        Ok(ids) => ids,
        Err(err) => return error_response(err),
    };

    match service
        .log_interaction(&user_id, &contact_id, Utc::now())
        .await
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn override_handler<S, A>(
    State(service): State<Arc<HealthScoringService<S, A>>>,
    Path((user_id, contact_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ScoreOverrideRequest>,
) -> Response
where
    S: HealthRecordStore + 'static,
    A: AlertPublisher + 'static,
{
    let (user_id, contact_id) = match parse_ids(&user_id, &contact_id) {
        Ok(ids) => ids,
        Err(err) => return error_response(err),
    };

    match service
        .update_health_score(&user_id, &contact_id, request.score, Utc::now())
        .await
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn parse_ids(user_id: &str, contact_id: &str) -> Result<(UserId, ContactId), HealthServiceError> {
    Ok((UserId::parse(user_id)?, ContactId::parse(contact_id)?))
}

fn error_response(err: HealthServiceError) -> Response {
    let status = match &err {
        HealthServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        HealthServiceError::Store(StoreError::Rejected(_)) => StatusCode::BAD_GATEWAY,
        HealthServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
