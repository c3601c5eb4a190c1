use crate::report_service::{ReportError, ReportOutcome, ReportStats};
use crate::routes::ErrorResponse;
use crate::routes::constants::{
    ERROR_REPORT_GENERATION_FAILED, ERROR_REPORT_SEND_FAILED, REPORT_ALREADY_SENT_MESSAGE,
    REPORT_SENT_MESSAGE,
};
use crate::startup::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[derive(serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    /// Send even if today's report already went out
    #[serde(default)]
    pub force: bool,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub stats: ReportStats,
}

impl From<ReportOutcome> for ReportResponse {
    fn from(outcome: ReportOutcome) -> Self {
        let (message, stats) = match outcome {
            ReportOutcome::Sent(stats) => (REPORT_SENT_MESSAGE, stats),
            ReportOutcome::AlreadySent(stats) => (REPORT_ALREADY_SENT_MESSAGE, stats),
        };
        Self {
            success: true,
            message: message.to_string(),
            stats,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(
            error.cause_chain = ?self,
            error.message = %self,
            "Failed to deliver the daily report"
        );
        let error = match self {
            ReportError::SendError(_) => ERROR_REPORT_SEND_FAILED,
            ReportError::StoreError(_) => ERROR_REPORT_GENERATION_FAILED,
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(error)),
        )
            .into_response()
    }
}

/// Trigger the daily report
///
/// Meant for an external scheduler. Also served at `POST /api/send-report`.
/// Without `force` a second trigger on the same UTC day does not send again.
#[utoipa::path(
    post,
    path = "/api/cron/report",
    tag = "reports",
    params(ReportParams),
    responses(
        (status = 200, description = "Report sent or already sent today", body = ReportResponse),
        (status = 500, description = "The report could not be built or sent", body = ErrorResponse)
    )
)]
#[tracing::instrument(name = "Daily report trigger", skip(state, params), fields(force = params.force))]
pub async fn send_daily_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ReportResponse>, ReportError> {
    let outcome = state.reports.send_daily_report(params.force).await?;
    Ok(Json(outcome.into()))
}
