use crate::routes::constants::{
    ERROR_ALREADY_SUBSCRIBED, ERROR_INVALID_EMAIL, ERROR_SOMETHING_WENT_WRONG,
    SUBSCRIBE_SUCCESS_MESSAGE,
};
use crate::routes::ErrorResponse;
use crate::startup::AppState;
use crate::subscription_service::SubscribeError;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct SubscribeRequest {
    // A missing field is reported like an invalid address
    #[serde(default)]
    pub email: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SubscribeResponse {
    pub message: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SubscriberStats {
    pub count: u64,
    pub domain: String,
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match &self {
            SubscribeError::ValidationError(_) => (StatusCode::BAD_REQUEST, ERROR_INVALID_EMAIL),
            SubscribeError::AlreadySubscribed(_) => {
                (StatusCode::BAD_REQUEST, ERROR_ALREADY_SUBSCRIBED)
            }
            SubscribeError::StoreError(_) => {
                tracing::error!(
                    error.cause_chain = ?self,
                    error.message = %self,
                    "Failed to subscribe"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        };
        (status, Json(ErrorResponse::new(error))).into_response()
    }
}

/// Subscribe an email address
///
/// Records the address together with the signup time. An address that is
/// already subscribed is rejected.
#[utoipa::path(
    post,
    path = "/api/subscribe",
    tag = "subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscriber recorded", body = SubscribeResponse),
        (status = 400, description = "Invalid or already subscribed email", body = ErrorResponse),
        (status = 500, description = "The store is unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(name = "Subscribe request", skip_all)]
pub async fn subscribe(
    State(state): State<AppState>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, SubscribeError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::info!("Rejected subscribe body: {}", rejection.body_text());
        SubscribeError::ValidationError(rejection.body_text())
    })?;
    state.subscriptions.subscribe(body.email).await?;
    Ok(Json(SubscribeResponse {
        message: SUBSCRIBE_SUCCESS_MESSAGE.to_string(),
    }))
}

/// Subscriber count
///
/// Also served at `GET /api/subscribe`. A store failure reads as zero.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Number of subscribers", body = SubscriberStats)
    )
)]
pub async fn subscriber_stats(State(state): State<AppState>) -> Json<SubscriberStats> {
    Json(SubscriberStats {
        count: state.subscriptions.count().await,
        domain: state.subscriptions.domain().to_string(),
    })
}
