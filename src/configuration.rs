use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::kv_store::{InMemoryStore, KeyValueStore, RedisStore, StoreError};
use config::{Config, ConfigError, File};
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::sync::Arc;

/// Conventional deployment variables, mapped onto settings keys.
/// They are applied after the `APP_` prefixed variables.
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("RESEND_API_KEY", "email_client.api_key"),
    ("FROM_EMAIL", "email_client.sender"),
    ("REPORT_EMAIL", "report.recipient"),
    ("DOMAIN", "application.domain"),
    ("PORT", "application.port"),
    ("REDIS_URL", "kv_store.redis_uri"),
];

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub report: ReportSettings,
    pub kv_store: KvStoreSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Serving domain, recorded on every subscriber and echoed by `/health`.
    pub domain: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    // No key means log-only delivery
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// The provider key, treating an empty value the same as an unset one.
    pub fn api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .cloned()
    }

    pub fn client(&self) -> Result<EmailClient, reqwest::Error> {
        EmailClient::new(
            self.base_url.clone(),
            self.sender.clone(),
            self.api_key(),
            self.timeout(),
        )
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ReportSettings {
    pub recipient: String,
    #[serde(default)]
    pub notify_on_subscribe: bool,
}

impl ReportSettings {
    pub fn recipient(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.recipient.clone())
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KvBackend {
    Redis,
    InMemory,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct KvStoreSettings {
    pub backend: KvBackend,
    pub redis_uri: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pool_size: usize,
}

impl KvStoreSettings {
    pub async fn connect(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        match self.backend {
            KvBackend::Redis => {
                let store = RedisStore::connect(self.redis_uri.expose_secret(), self.pool_size)
                    .await?;
                Ok(Arc::new(store))
            }
            KvBackend::InMemory => {
                tracing::warn!("Using the in-memory store, subscribers will not survive a restart");
                Ok(Arc::new(InMemoryStore::default()))
            }
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment, defaulting to `local`
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut builder = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)))
        // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );
    for (variable, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, std::env::var(variable).ok())?;
    }

    tracing::info!("Application environment = {:?}", environment);

    builder.build()?.try_deserialize::<Settings>()
}
