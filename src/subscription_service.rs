use crate::domain::{Subscriber, SubscriberEmail};
use crate::email_client::{EmailClient, EmailData};
use crate::email_templates::{NEW_SUBSCRIBER_SUBJECT, new_subscriber_html};
use crate::kv_store::{
    KeyValueStore, SUBSCRIBER_EMAILS_KEY, SUBSCRIBERS_LAST_UPDATE_KEY, StoreError,
    daily_subscribers_key, subscriber_key,
};
use crate::telemetry::error_chain_fmt;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} is already subscribed.")]
    AlreadySubscribed(SubscriberEmail),
    #[error("Failed to record the new subscriber.")]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Mails the operator about every new signup.
#[derive(Clone, Debug)]
pub struct SignupNotifier {
    pub email_client: EmailClient,
    pub recipient: SubscriberEmail,
}

#[derive(Clone, Debug)]
pub struct SubscriptionService {
    store: Arc<dyn KeyValueStore>,
    domain: String,
    notifier: Option<SignupNotifier>,
}

impl SubscriptionService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        domain: String,
        notifier: Option<SignupNotifier>,
    ) -> Self {
        Self {
            store,
            domain,
            notifier,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub async fn subscribe(&self, email: String) -> Result<Subscriber, SubscribeError> {
        self.subscribe_at(email, Utc::now()).await
    }

    /// Records a signup as if it happened at `subscribed_at`.
    ///
    /// The four writes are independent: a failure half-way leaves whatever
    /// was already written in place.
    #[tracing::instrument(
        name = "Adding a new subscriber",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn subscribe_at(
        &self,
        email: String,
        subscribed_at: DateTime<Utc>,
    ) -> Result<Subscriber, SubscribeError> {
        let email = SubscriberEmail::parse(email).map_err(SubscribeError::ValidationError)?;
        if self
            .store
            .set_contains(SUBSCRIBER_EMAILS_KEY, email.as_ref())
            .await?
        {
            return Err(SubscribeError::AlreadySubscribed(email));
        }

        let subscriber = Subscriber::new(email, self.domain.clone(), subscribed_at);
        self.insert_subscriber(&subscriber).await?;

        if let Some(notifier) = &self.notifier {
            send_signup_notification(notifier, &subscriber).await;
        }
        Ok(subscriber)
    }

    #[tracing::instrument(name = "Saving new subscriber details in the store", skip_all)]
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        let email = subscriber.email.as_ref();
        self.store
            .hash_set(&subscriber_key(&subscriber.email), subscriber.to_fields())
            .await?;
        if !self.store.set_add(SUBSCRIBER_EMAILS_KEY, email).await? {
            // Lost a race against a concurrent signup of the same address
            tracing::warn!("{} was added to the subscriber set concurrently", email);
        }
        self.store
            .set_add(&daily_subscribers_key(subscriber.signup_date()), email)
            .await?;
        self.store
            .set(SUBSCRIBERS_LAST_UPDATE_KEY, &subscriber.timestamp())
            .await?;
        Ok(())
    }

    /// Number of subscribers ever recorded. A store failure reads as zero.
    #[tracing::instrument(name = "Counting subscribers", skip(self))]
    pub async fn count(&self) -> u64 {
        match self.store.set_cardinality(SUBSCRIBER_EMAILS_KEY).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to read the subscriber count, reporting zero"
                );
                0
            }
        }
    }
}

#[tracing::instrument(name = "Notify the operator about a new subscriber", skip_all)]
async fn send_signup_notification(notifier: &SignupNotifier, subscriber: &Subscriber) {
    let html_content = new_subscriber_html(subscriber);
    if let Err(e) = notifier
        .email_client
        .send_email(EmailData {
            recipient: &notifier.recipient,
            subject: NEW_SUBSCRIBER_SUBJECT,
            html_content: &html_content,
        })
        .await
    {
        // The signup is already stored, so this is not the caller's problem
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to notify the operator about a new subscriber"
        );
    }
}
