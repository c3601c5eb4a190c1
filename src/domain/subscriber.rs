use crate::domain::SubscriberEmail;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::collections::HashMap;

/// Every signup through this service is tagged with the same source.
pub const SUBSCRIBER_SOURCE: &str = "website";

const EMAIL_FIELD: &str = "email";
const TIMESTAMP_FIELD: &str = "timestamp";
const SOURCE_FIELD: &str = "source";
const DOMAIN_FIELD: &str = "domain";

/// A recorded signup. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
    pub source: String,
    pub domain: String,
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidSubscriberRecord {
    #[error("The stored subscriber record has no `{0}` field.")]
    MissingField(&'static str),
    #[error("The stored subscriber timestamp is not ISO-8601.")]
    InvalidTimestamp(#[source] chrono::ParseError),
    #[error("{0}")]
    InvalidEmail(String),
}

impl Subscriber {
    pub fn new(email: SubscriberEmail, domain: String, subscribed_at: DateTime<Utc>) -> Self {
        Self {
            email,
            subscribed_at,
            source: SUBSCRIBER_SOURCE.to_string(),
            domain,
        }
    }

    /// The UTC calendar day the signup belongs to.
    pub fn signup_date(&self) -> NaiveDate {
        self.subscribed_at.date_naive()
    }

    /// ISO-8601 with millisecond precision, e.g. `2024-05-01T09:15:02.123Z`.
    pub fn timestamp(&self) -> String {
        self.subscribed_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn time_of_day(&self) -> String {
        self.subscribed_at.format("%H:%M:%S").to_string()
    }

    pub fn to_fields(&self) -> HashMap<String, String> {
        HashMap::from([
            (EMAIL_FIELD.to_string(), self.email.to_string()),
            (TIMESTAMP_FIELD.to_string(), self.timestamp()),
            (SOURCE_FIELD.to_string(), self.source.clone()),
            (DOMAIN_FIELD.to_string(), self.domain.clone()),
        ])
    }
}

impl TryFrom<HashMap<String, String>> for Subscriber {
    type Error = InvalidSubscriberRecord;

    fn try_from(mut fields: HashMap<String, String>) -> Result<Self, Self::Error> {
        let mut take = |name: &'static str| {
            fields
                .remove(name)
                .ok_or(InvalidSubscriberRecord::MissingField(name))
        };
        let email =
            SubscriberEmail::parse(take(EMAIL_FIELD)?).map_err(InvalidSubscriberRecord::InvalidEmail)?;
        let subscribed_at = DateTime::parse_from_rfc3339(&take(TIMESTAMP_FIELD)?)
            .map_err(InvalidSubscriberRecord::InvalidTimestamp)?
            .with_timezone(&Utc);
        let source = take(SOURCE_FIELD)?;
        let domain = take(DOMAIN_FIELD)?;
        Ok(Self {
            email,
            subscribed_at,
            source,
            domain,
        })
    }
}
