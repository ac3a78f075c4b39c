use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{join_path, MailConfig};

/// A single HTML email with exactly one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider-assigned identifier confirming the email was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailReceipt {
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email provider rejected the message: {message}")]
    Provider { status: u16, message: String },
    #[error("email provider response missing ID")]
    MissingId,
    #[error("email transport unavailable: {0}")]
    Transport(String),
}

/// Outbound transactional email hook. Implementations never retry.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<EmailReceipt, MailError>;
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Client for the Resend `POST /emails` endpoint.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_url: &Url, api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: Client::new(),
            endpoint: join_path(api_url, "emails")?,
            api_key: api_key.into(),
        })
    }

    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, url::ParseError> {
        config
            .api_key
            .as_deref()
            .map(|key| Self::new(&config.api_url, key))
            .transpose()
    }
}

#[async_trait]
impl EmailProvider for ResendMailer {
    async fn send(&self, email: OutboundEmail) -> Result<EmailReceipt, MailError> {
        let body = SendEmailBody {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ProviderErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("provider returned HTTP {}", status.as_u16()));
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendEmailResponse =
            serde_json::from_slice(&bytes).map_err(|_| MailError::MissingId)?;
        match parsed.id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(EmailReceipt { id }),
            None => Err(MailError::MissingId),
        }
    }
}
