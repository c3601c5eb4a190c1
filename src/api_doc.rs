use crate::report_service::ReportStats;
use crate::routes::{
    ErrorResponse, HealthResponse, ReportResponse, SubscribeRequest, SubscribeResponse,
    SubscriberStats,
};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Qosmos subscriber API"),
    paths(
        crate::routes::health_check,
        crate::routes::subscribe,
        crate::routes::subscriber_stats,
        crate::routes::send_daily_report,
    ),
    components(schemas(
        ErrorResponse,
        HealthResponse,
        ReportResponse,
        ReportStats,
        SubscribeRequest,
        SubscribeResponse,
        SubscriberStats,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "subscriptions", description = "Landing page signups"),
        (name = "reports", description = "Daily report to the operator")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
