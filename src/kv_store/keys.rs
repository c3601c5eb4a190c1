use crate::domain::SubscriberEmail;
use chrono::NaiveDate;

pub const SUBSCRIBER_EMAILS_KEY: &str = "subscribers:emails";
pub const SUBSCRIBERS_LAST_UPDATE_KEY: &str = "subscribers:lastUpdate";
pub const REPORT_LAST_SENT_KEY: &str = "reports:lastSent";

pub fn subscriber_key(email: &SubscriberEmail) -> String {
    format!("subscriber:{}", email.as_ref())
}

pub fn daily_subscribers_key(date: NaiveDate) -> String {
    format!("subscribers:today:{}", date_key(date))
}

/// `YYYY-MM-DD`, the date format shared by the per-day sets and the report marker.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
