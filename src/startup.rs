use crate::api_doc::openapi_json;
use crate::configuration::Settings;
use crate::kv_store::KeyValueStore;
use crate::report_service::ReportService;
use crate::routes::{health_check, send_daily_report, subscribe, subscriber_stats};
use crate::subscription_service::{SignupNotifier, SubscriptionService};
use anyhow::Context;
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use std::net::TcpListener;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService,
    pub reports: ReportService,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let store = configuration
            .kv_store
            .connect()
            .await
            .context("Failed to connect to the key-value store")?;
        Self::build_with_store(configuration, store)
    }

    /// Same as [`Application::build`], on top of an already connected store.
    pub fn build_with_store(
        configuration: Settings,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, anyhow::Error> {
        let email_client = configuration
            .email_client
            .client()
            .context("Failed to build the email client")?;
        if !email_client.is_live() {
            tracing::warn!("No email API key configured, emails will only be logged");
        }
        let recipient = configuration
            .report
            .recipient()
            .map_err(anyhow::Error::msg)
            .context("Invalid report recipient")?;
        let domain = configuration.application.domain;

        let notifier = configuration
            .report
            .notify_on_subscribe
            .then(|| SignupNotifier {
                email_client: email_client.clone(),
                recipient: recipient.clone(),
            });
        let state = AppState {
            subscriptions: SubscriptionService::new(store.clone(), domain.clone(), notifier),
            reports: ReportService::new(store, email_client, recipient, domain),
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let app = router(self.state);
        let listener = tokio::net::TcpListener::from_std(self.listener)?;
        tracing::info!("Listening on port {}", self.port);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/subscribe", post(subscribe).get(subscriber_stats))
        .route("/api/stats", get(subscriber_stats))
        .route("/api/cron/report", post(send_daily_report))
        .route("/api/send-report", post(send_daily_report))
        .route("/api/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
