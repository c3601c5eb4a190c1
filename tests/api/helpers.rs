use async_trait::async_trait;
use qosmos::configuration::{Settings, get_configuration};
use qosmos::kv_store::{InMemoryStore, KeyValueStore, StoreError};
use qosmos::startup::Application;
use qosmos::telemetry::{get_subscriber, init_subscriber};
use secrecy::Secret;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the subscriber type, hence the two branches
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub domain: String,
    pub store: Arc<dyn KeyValueStore>,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_report(&self, force: bool) -> reqwest::Response {
        let path = if force {
            "/api/cron/report?force=true"
        } else {
            "/api/cron/report"
        };
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_send_report(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/send-report", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// JSON bodies of every email the mock provider received, oldest first.
    pub async fn sent_emails(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .expect("Request recording is disabled.")
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("Email body is not JSON."))
            .collect()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}, Arc::new(InMemoryStore::default())).await
}

pub async fn spawn_app_without_api_key() -> TestApp {
    spawn_app_with(
        |c| c.email_client.api_key = None,
        Arc::new(InMemoryStore::default()),
    )
    .await
}

pub async fn spawn_app_with(
    customise: impl FnOnce(&mut Settings),
    store: Arc<dyn KeyValueStore>,
) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let email_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        c.application.host = "127.0.0.1".into();
        c.email_client.base_url = email_server.uri();
        c.email_client.api_key = Some(Secret::new("test-api-key".into()));
        c.report.notify_on_subscribe = false;
        customise(&mut c);
        c
    };
    let domain = configuration.application.domain.clone();

    let application = Application::build_with_store(configuration, store.clone())
        .expect("Failed to build application.");
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);

    #[allow(clippy::let_underscore_future)]
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        port,
        domain,
        store,
        email_server,
        api_client: reqwest::Client::new(),
    }
}

/// A store whose every command fails, as if the server were unreachable.
#[derive(Debug)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> StoreError {
        anyhow::anyhow!("Connection refused").into()
    }
}

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn set_add(&self, _key: &str, _member: &str) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn set_contains(&self, _key: &str, _member: &str) -> Result<bool, StoreError> {
        Err(Self::error())
    }

    async fn set_members(&self, _key: &str) -> Result<Vec<String>, StoreError> {
        Err(Self::error())
    }

    async fn set_cardinality(&self, _key: &str) -> Result<u64, StoreError> {
        Err(Self::error())
    }

    async fn hash_set(
        &self,
        _key: &str,
        _fields: HashMap<String, String>,
    ) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn hash_get_all(&self, _key: &str) -> Result<HashMap<String, String>, StoreError> {
        Err(Self::error())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(Self::error())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }
}
