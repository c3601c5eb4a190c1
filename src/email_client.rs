use crate::domain::SubscriberEmail;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Client for a Resend-compatible transactional email API.
///
/// Without an authorization token nothing goes over the network: the email
/// is written to the log and the send counts as a success.
#[derive(Clone, Debug)]
pub struct EmailClient {
    base_url: String,
    http_client: Client,
    sender: String,
    authorization_token: Option<Secret<String>>,
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug)]
pub struct EmailData<'a> {
    pub recipient: &'a SubscriberEmail,
    pub subject: &'a str,
    pub html_content: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        authorization_token: Option<Secret<String>>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        })
    }

    /// Whether emails actually go out to the provider.
    pub fn is_live(&self) -> bool {
        self.authorization_token.is_some()
    }

    #[tracing::instrument(
        name = "Sending email",
        skip(self, data),
        fields(recipient = %data.recipient, subject = %data.subject)
    )]
    pub async fn send_email(&self, data: EmailData<'_>) -> Result<(), reqwest::Error> {
        let Some(authorization_token) = &self.authorization_token else {
            tracing::info!(
                email.from = %self.sender,
                email.html = %data.html_content,
                "No email API key configured, logging the email instead of sending it"
            );
            return Ok(());
        };

        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: [data.recipient.as_ref()],
            subject: data.subject,
            html: data.html_content,
        };
        self.http_client
            .post(&url)
            .bearer_auth(authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                tracing::error!("Failed to send email: {:?}", e);
                e
            })?;
        Ok(())
    }
}
