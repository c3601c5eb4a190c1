//! HTML bodies of the emails sent to the operator.

use crate::domain::Subscriber;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use htmlescape::encode_minimal;

pub const NO_NEW_SUBSCRIBERS_PLACEHOLDER: &str = "No new subscribers today";

const BODY_STYLE: &str = "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
sans-serif; margin: 0 auto; padding: 20px; background: #f5f5f5;";
const CARD_STYLE: &str = "background: white; border-radius: 12px; padding: 32px; \
box-shadow: 0 2px 8px rgba(0,0,0,0.08);";

pub struct DailyReport<'a> {
    pub date: NaiveDate,
    pub total: u64,
    pub today: u64,
    /// Today's signups, already in signup order.
    pub new_subscribers: &'a [Subscriber],
    pub domain: &'a str,
    pub generated_at: DateTime<Utc>,
}

impl DailyReport<'_> {
    pub fn subject(&self) -> String {
        format!("📊 Qosmos Daily Report - {}", self.date.format("%Y-%m-%d"))
    }

    pub fn html(&self) -> String {
        let domain = encode_minimal(self.domain);
        let new_subscribers = if self.new_subscribers.is_empty() {
            format!(r#"<p style="color: #999;">{}</p>"#, NO_NEW_SUBSCRIBERS_PLACEHOLDER)
        } else {
            let rows: String = self
                .new_subscribers
                .iter()
                .map(|s| {
                    format!(
                        r#"<li>{} <span style="color: #999; font-size: 12px;">({})</span></li>"#,
                        encode_minimal(s.email.as_ref()),
                        s.time_of_day()
                    )
                })
                .collect();
            format!(
                r#"<h2 style="font-size: 16px; color: #1a1a2e; margin: 24px 0 12px 0;">🆕 New Subscribers Today</h2>
    <ul style="margin: 0; padding: 0 0 0 20px; color: #444; line-height: 1.8;">{}</ul>"#,
                rows
            )
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="{body_style} max-width: 600px;">
  <div style="{card_style}">
    <h1 style="margin: 0 0 8px 0; color: #1a1a2e; font-size: 24px;">📊 Qosmos Daily Report</h1>
    <p style="color: #666; margin: 0 0 24px 0;">{date}</p>
    <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-bottom: 24px;">
      <div style="background: #f0f7ff; border-radius: 8px; padding: 16px; text-align: center;">
        <div style="font-size: 32px; font-weight: 700; color: #5B7FFF;">{total}</div>
        <div style="color: #666; font-size: 14px;">Total Subscribers</div>
      </div>
      <div style="background: #f0fff4; border-radius: 8px; padding: 16px; text-align: center;">
        <div style="font-size: 32px; font-weight: 700; color: #22c55e;">{today}</div>
        <div style="color: #666; font-size: 14px;">New Today</div>
      </div>
    </div>
    {new_subscribers}
    <hr style="border: none; border-top: 1px solid #eee; margin: 24px 0;">
    <p style="color: #999; font-size: 12px; margin: 0;">
      This is an automated report from <a href="https://{domain}" style="color: #5B7FFF;">{domain}</a><br>
      Generated at {generated_at}
    </p>
  </div>
</body>
</html>
"#,
            body_style = BODY_STYLE,
            card_style = CARD_STYLE,
            date = self.date.format("%Y-%m-%d"),
            total = self.total,
            today = self.today,
            new_subscribers = new_subscribers,
            domain = domain,
            generated_at = self
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}

pub const NEW_SUBSCRIBER_SUBJECT: &str = "🎉 New Subscriber - Qosmos";

pub fn new_subscriber_html(subscriber: &Subscriber) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="{body_style} max-width: 500px;">
  <div style="{card_style}">
    <h1 style="margin: 0 0 16px 0; color: #1a1a2e; font-size: 24px;">🎉 New Subscriber!</h1>
    <div style="background: #f0f7ff; border-radius: 8px; padding: 20px; margin: 20px 0;">
      <p style="margin: 0 0 8px 0; color: #666; font-size: 14px;">New user has subscribed:</p>
      <p style="margin: 0; font-size: 20px; font-weight: 600; color: #5B7FFF;">{email}</p>
    </div>
    <p style="color: #999; font-size: 12px; margin: 24px 0 0 0;">
      Submitted at {submitted_at} UTC
    </p>
  </div>
</body>
</html>
"#,
        body_style = BODY_STYLE,
        card_style = CARD_STYLE,
        email = encode_minimal(subscriber.email.as_ref()),
        submitted_at = subscriber.subscribed_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
