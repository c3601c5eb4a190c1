pub mod constants;
mod daily_report;
pub mod health_check; // Public for OpenAPI annotations
mod subscriptions;

pub use daily_report::*;
pub use health_check::*;
pub use subscriptions::*;

/// Body of every non-2xx JSON response.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
