use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::{ConfigError, StoreConfig};
use crate::consultation::ConsultationRequest;
use crate::notify::DispatchReport;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("dispatcher returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("dispatcher unreachable: {0}")]
    Transport(String),
    #[error("dispatcher response unreadable: {0}")]
    Decode(String),
}

impl GatewayError {
    /// True for HTTP 429 or an error message that names the rate limit.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GatewayError::Rejected { status, message } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || mentions_rate_limit(message)
            }
            GatewayError::Transport(message) | GatewayError::Decode(message) => {
                mentions_rate_limit(message)
            }
        }
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("too many requests") || lowered.contains("rate limit")
}

/// Invokes the notification dispatcher on behalf of the form.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn notify(&self, request: &ConsultationRequest) -> Result<DispatchReport, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Calls the dispatcher over HTTPS the way the hosted functions client does.
#[derive(Debug, Clone)]
pub struct HttpNotificationGateway {
    client: Client,
    endpoint: Url,
    anon_key: Option<String>,
}

impl HttpNotificationGateway {
    pub fn new(endpoint: Url, anon_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            anon_key,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.resolve_dispatcher_url()?,
            config.anon_key.clone(),
        ))
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn notify(&self, request: &ConsultationRequest) -> Result<DispatchReport, GatewayError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.anon_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection_uses_status_or_message() {
        let by_status = GatewayError::Rejected {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(by_status.is_rate_limited());

        let by_message = GatewayError::Rejected {
            status: 500,
            message: "Too many requests. Please try again in an hour.".to_string(),
        };
        assert!(by_message.is_rate_limited());

        let other = GatewayError::Rejected {
            status: 500,
            message: "RESEND_API_KEY not configured".to_string(),
        };
        assert!(!other.is_rate_limited());
        assert!(!GatewayError::Transport("connection reset".to_string()).is_rate_limited());
    }
}
