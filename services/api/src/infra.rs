use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use gamedog_consult::config::AppConfig;
use gamedog_consult::error::AppError;
use gamedog_consult::notify::{MailProfile, NotificationDispatcher, RateLimiter, ResendMailer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn mail_profile(config: &AppConfig) -> MailProfile {
    MailProfile {
        from_address: config.mail.from_address.clone(),
        admin_address: config.mail.admin_address.clone(),
        business: config.business.clone(),
    }
}

/// A missing API key is not fatal at startup; requests get a 500 instead.
pub(crate) fn build_dispatcher(
    config: &AppConfig,
) -> Result<NotificationDispatcher<ResendMailer>, AppError> {
    let mailer = ResendMailer::from_config(&config.mail)?.map(Arc::new);
    if mailer.is_none() {
        tracing::warn!("RESEND_API_KEY not set; dispatcher will reject requests until configured");
    }

    Ok(NotificationDispatcher::new(
        RateLimiter::new(config.rate_limit),
        mailer,
        mail_profile(config),
    ))
}
