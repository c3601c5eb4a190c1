use crate::startup::AppState;
use axum::Json;
use axum::extract::State;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub domain: String,
}

/// Health check endpoint
///
/// Returns 200 OK with the serving domain if the service is running
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        domain: state.subscriptions.domain().to_string(),
    })
}
