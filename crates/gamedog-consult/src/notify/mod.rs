//! Notification dispatcher: the HTTP endpoint that re-validates a consultation,
//! rate limits the caller, and sends the admin and acknowledgment emails.

pub mod mailer;
pub mod rate_limit;
pub mod router;
pub mod service;
pub mod templates;

pub use mailer::{EmailProvider, EmailReceipt, MailError, OutboundEmail, ResendMailer};
pub use rate_limit::{client_identifier, RateDecision, RateLimiter, UNKNOWN_CLIENT};
pub use router::{dispatcher_cors, notification_router, DISPATCH_PATH};
pub use service::{
    DispatchError, DispatchReport, EmailStatus, NotificationDispatcher, ADMIN_FAILED_MESSAGE,
    PROCESSED_MESSAGE,
};
pub use templates::MailProfile;
