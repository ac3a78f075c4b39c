use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::mailer::{EmailProvider, MailError, OutboundEmail};
use super::rate_limit::{RateDecision, RateLimiter};
use super::templates::{admin_notification, user_acknowledgment, MailProfile};
use crate::consultation::{check_payload, sanitize, ConsultationRequest, PayloadRejection};

pub const PROCESSED_MESSAGE: &str = "Consultation request processed successfully";
pub const ADMIN_FAILED_MESSAGE: &str = "Consultation request received. Admin notification may have failed - please contact us directly if urgent.";

/// Per-email delivery outcome reported back to the form controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStatus {
    pub admin_email: bool,
    pub user_email: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_error: Option<String>,
}

/// Body of every 200 response, including ones where both sends failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub success: bool,
    pub message: String,
    pub email_status: EmailStatus,
}

impl DispatchReport {
    pub fn from_status(email_status: EmailStatus) -> Self {
        let message = if email_status.admin_email {
            PROCESSED_MESSAGE
        } else {
            ADMIN_FAILED_MESSAGE
        };
        Self {
            success: true,
            message: message.to_string(),
            email_status,
        }
    }
}

/// Request-level failures. None of these attempt any email.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Too many requests. Please try again in an hour.")]
    RateLimited,
    #[error("RESEND_API_KEY not configured")]
    MailerNotConfigured,
    #[error("Invalid JSON payload")]
    MalformedPayload(#[source] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] PayloadRejection),
}

/// Re-validates, rate limits, sanitizes, and sends both notification emails.
pub struct NotificationDispatcher<M> {
    limiter: RateLimiter,
    mailer: Option<Arc<M>>,
    profile: MailProfile,
}

impl<M> NotificationDispatcher<M>
where
    M: EmailProvider + 'static,
{
    pub fn new(limiter: RateLimiter, mailer: Option<Arc<M>>, profile: MailProfile) -> Self {
        Self {
            limiter,
            mailer,
            profile,
        }
    }

    pub fn profile(&self) -> &MailProfile {
        &self.profile
    }

    /// Handles one raw request body for the given client.
    ///
    /// The rate limit is charged before the body is parsed, so malformed or
    /// invalid requests still count against the client's window.
    pub async fn dispatch(
        &self,
        client_id: &str,
        body: &[u8],
    ) -> Result<DispatchReport, DispatchError> {
        info!(client_id, "processing consultation email request");

        if let RateDecision::Limited { retry_after } = self.limiter.check(client_id) {
            warn!(
                client_id,
                retry_after_secs = retry_after.as_secs(),
                "rate limit exceeded"
            );
            return Err(DispatchError::RateLimited);
        }

        let Some(mailer) = self.mailer.as_ref() else {
            tracing::error!("RESEND_API_KEY not configured");
            return Err(DispatchError::MailerNotConfigured);
        };

        let request: ConsultationRequest =
            serde_json::from_slice(body).map_err(DispatchError::MalformedPayload)?;

        self.deliver(mailer.as_ref(), client_id, &request).await
    }

    async fn deliver(
        &self,
        mailer: &M,
        client_id: &str,
        request: &ConsultationRequest,
    ) -> Result<DispatchReport, DispatchError> {
        if let Err(rejection) = check_payload(request) {
            if rejection == PayloadRejection::Spam {
                warn!(client_id, "spam detected: honeypot field filled");
            } else {
                warn!(client_id, error = %rejection, "validation failed");
            }
            return Err(rejection.into());
        }

        let consultation = sanitize(request);
        info!(
            client_id,
            email = %consultation.email,
            has_phone = consultation.phone.is_some(),
            sport = consultation.sport.as_deref().unwrap_or("-"),
            message_len = consultation.message.chars().count(),
            "validated consultation payload"
        );

        let admin = admin_notification(&self.profile, &consultation, Utc::now());
        let admin_result = send_isolated(mailer, "admin", admin).await;

        let user = user_acknowledgment(&self.profile, &consultation);
        let user_result = send_isolated(mailer, "user", user).await;

        let status = EmailStatus {
            admin_email: admin_result.is_ok(),
            user_email: user_result.is_ok(),
            admin_error: admin_result.err(),
            user_error: user_result.err(),
        };

        info!(
            client_id,
            admin_email = status.admin_email,
            user_email = status.user_email,
            admin_error = status.admin_error.as_deref().unwrap_or(""),
            user_error = status.user_error.as_deref().unwrap_or(""),
            "email delivery summary"
        );
        if !status.admin_email {
            warn!(client_id, "admin email delivery failed; operator may not be notified");
        }

        Ok(DispatchReport::from_status(status))
    }
}

/// One send attempt. Errors are flattened to text for the status report.
async fn send_isolated<M: EmailProvider + ?Sized>(
    mailer: &M,
    audience: &'static str,
    email: OutboundEmail,
) -> Result<String, String> {
    match mailer.send(email).await {
        Ok(receipt) => {
            info!(audience, email_id = %receipt.id, "email sent");
            Ok(receipt.id)
        }
        Err(err) => {
            let detail = match &err {
                MailError::Provider { message, .. } => message.clone(),
                other => other.to_string(),
            };
            warn!(audience, error = %err, "email send failed");
            Err(detail)
        }
    }
}
