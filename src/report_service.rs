use crate::domain::{Subscriber, SubscriberEmail};
use crate::email_client::{EmailClient, EmailData};
use crate::email_templates::DailyReport;
use crate::kv_store::{
    KeyValueStore, REPORT_LAST_SENT_KEY, SUBSCRIBER_EMAILS_KEY, StoreError, daily_subscribers_key,
    date_key, subscriber_key,
};
use crate::telemetry::error_chain_fmt;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct ReportStats {
    /// All-time subscriber count
    pub total: u64,
    /// Subscribers who signed up on the report day
    pub today: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent(ReportStats),
    AlreadySent(ReportStats),
}

#[derive(thiserror::Error)]
pub enum ReportError {
    #[error("Failed to generate the daily report.")]
    StoreError(#[from] StoreError),
    #[error("Failed to send the daily report.")]
    SendError(#[source] reqwest::Error),
}

impl std::fmt::Debug for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Clone, Debug)]
pub struct ReportService {
    store: Arc<dyn KeyValueStore>,
    email_client: EmailClient,
    recipient: SubscriberEmail,
    domain: String,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        email_client: EmailClient,
        recipient: SubscriberEmail,
        domain: String,
    ) -> Self {
        Self {
            store,
            email_client,
            recipient,
            domain,
        }
    }

    /// Entry point for the scheduler: sends today's report unless it already
    /// went out. `force` skips that check.
    pub async fn send_daily_report(&self, force: bool) -> Result<ReportOutcome, ReportError> {
        self.send_daily_report_at(Utc::now(), force).await
    }

    #[tracing::instrument(name = "Sending the daily report if due", skip(self))]
    pub async fn send_daily_report_at(
        &self,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<ReportOutcome, ReportError> {
        let today = now.date_naive();
        if !force && self.last_sent().await?.as_deref() == Some(date_key(today).as_str()) {
            tracing::info!("The daily report for {} was already sent", today);
            let stats = self.stats_for(today).await?;
            return Ok(ReportOutcome::AlreadySent(stats));
        }
        let stats = self.generate_and_send_at(now).await?;
        Ok(ReportOutcome::Sent(stats))
    }

    pub async fn generate_and_send(&self) -> Result<ReportStats, ReportError> {
        self.generate_and_send_at(Utc::now()).await
    }

    /// Builds the report for the UTC day of `now`, mails it and, only when
    /// the provider accepted it, records the day as sent.
    #[tracing::instrument(
        name = "Generating and sending the daily report",
        skip(self),
        fields(total = tracing::field::Empty, today = tracing::field::Empty)
    )]
    pub async fn generate_and_send_at(&self, now: DateTime<Utc>) -> Result<ReportStats, ReportError> {
        let today = now.date_naive();
        let total = self.store.set_cardinality(SUBSCRIBER_EMAILS_KEY).await?;
        let today_emails = self
            .store
            .set_members(&daily_subscribers_key(today))
            .await?;
        let stats = ReportStats {
            total,
            today: today_emails.len() as u64,
        };
        tracing::Span::current()
            .record("total", stats.total)
            .record("today", stats.today);

        let new_subscribers = self.get_subscribers(today_emails).await?;
        let report = DailyReport {
            date: today,
            total: stats.total,
            today: stats.today,
            new_subscribers: &new_subscribers,
            domain: &self.domain,
            generated_at: now,
        };
        self.email_client
            .send_email(EmailData {
                recipient: &self.recipient,
                subject: &report.subject(),
                html_content: &report.html(),
            })
            .await
            .map_err(ReportError::SendError)?;

        self.store
            .set(REPORT_LAST_SENT_KEY, &date_key(today))
            .await?;
        Ok(stats)
    }

    pub async fn last_sent(&self) -> Result<Option<String>, StoreError> {
        self.store.get(REPORT_LAST_SENT_KEY).await
    }

    async fn stats_for(&self, date: NaiveDate) -> Result<ReportStats, StoreError> {
        Ok(ReportStats {
            total: self.store.set_cardinality(SUBSCRIBER_EMAILS_KEY).await?,
            today: self
                .store
                .set_cardinality(&daily_subscribers_key(date))
                .await?,
        })
    }

    /// Loads the records behind `emails`, oldest signup first. Emails without
    /// a readable record are left out.
    #[tracing::instrument(name = "Get today's subscribers", skip_all)]
    async fn get_subscribers(&self, emails: Vec<String>) -> Result<Vec<Subscriber>, StoreError> {
        let mut subscribers = Vec::with_capacity(emails.len());
        for email in emails {
            let Ok(email) = SubscriberEmail::parse(email) else {
                continue;
            };
            let fields = self.store.hash_get_all(&subscriber_key(&email)).await?;
            if fields.is_empty() {
                tracing::debug!("No record stored for {}, skipping", email);
                continue;
            }
            match Subscriber::try_from(fields) {
                Ok(subscriber) => subscribers.push(subscriber),
                Err(e) => tracing::debug!(
                    error.message = %e,
                    "Skipping unreadable record for {}",
                    email
                ),
            }
        }
        subscribers.sort_by_key(|s| s.subscribed_at);
        Ok(subscribers)
    }
}
