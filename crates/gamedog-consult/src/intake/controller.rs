use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::form::ConsultationForm;
use super::gateway::{GatewayError, NotificationGateway};
use super::store::{ConsultationStore, StoreError};
use crate::config::BusinessProfile;
use crate::consultation::{check_form, FormRejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// The single user-facing message produced by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    fn new(title: &str, description: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant,
        }
    }
}

/// Where a submission ended up. Every path except `InFlight` and `SpamDropped`
/// maps to exactly one toast.
#[derive(Debug)]
pub enum SubmissionOutcome {
    InFlight,
    SpamDropped,
    Rejected(FormRejection),
    PersistenceFailed(StoreError),
    RateLimited(GatewayError),
    /// Record saved; the dispatcher call itself failed.
    NotificationDegraded(GatewayError),
    /// Record saved; the dispatcher ran but the admin email did not go out.
    AdminNotificationFailed,
    Delivered,
}

impl SubmissionOutcome {
    pub fn toast(&self, business: &BusinessProfile) -> Option<Toast> {
        let toast = match self {
            SubmissionOutcome::InFlight | SubmissionOutcome::SpamDropped => return None,
            SubmissionOutcome::Rejected(rejection) => {
                Toast::new(rejection.title(), rejection.to_string(), ToastVariant::Destructive)
            }
            SubmissionOutcome::PersistenceFailed(_) => Toast::new(
                "Submission Failed",
                format!(
                    "We couldn't save your request. Please try again or call us at {}.",
                    business.phone
                ),
                ToastVariant::Destructive,
            ),
            SubmissionOutcome::RateLimited(_) => Toast::new(
                "Too Many Requests",
                "You've sent several requests recently. Please wait an hour before trying again.",
                ToastVariant::Destructive,
            ),
            SubmissionOutcome::NotificationDegraded(_) => Toast::new(
                "Request Received",
                "Your request was saved, but our notification may have failed. We'll still be in touch within 24 hours.",
                ToastVariant::Default,
            ),
            SubmissionOutcome::AdminNotificationFailed => Toast::new(
                "Request Received",
                format!(
                    "Your request was saved, but our team may not have been notified. Please call us directly at {}.",
                    business.phone
                ),
                ToastVariant::Default,
            ),
            SubmissionOutcome::Delivered => Toast::new(
                "Message Sent Successfully!",
                "We'll contact you within 24 hours to discuss your training goals.",
                ToastVariant::Default,
            ),
        };
        Some(toast)
    }

    /// The consultation row exists in the store.
    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::RateLimited(_)
                | SubmissionOutcome::NotificationDegraded(_)
                | SubmissionOutcome::AdminNotificationFailed
                | SubmissionOutcome::Delivered
        )
    }
}

/// Clears the busy flag on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Validates, persists, then notifies, strictly in that order.
pub struct ConsultationController<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
    business: BusinessProfile,
    busy: AtomicBool,
}

impl<S, G> ConsultationController<S, G>
where
    S: ConsultationStore + 'static,
    G: NotificationGateway + 'static,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>, business: BusinessProfile) -> Self {
        Self {
            store,
            gateway,
            business,
            busy: AtomicBool::new(false),
        }
    }

    pub fn business(&self) -> &BusinessProfile {
        &self.business
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn submit(&self, form: &mut ConsultationForm) -> SubmissionOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return SubmissionOutcome::InFlight;
        }
        let _guard = BusyGuard(&self.busy);

        let request = form.to_request();
        let record = match check_form(&request) {
            Ok(record) => record,
            Err(FormRejection::Honeypot) => {
                warn!("honeypot filled; dropping submission silently");
                return SubmissionOutcome::SpamDropped;
            }
            Err(rejection) => return SubmissionOutcome::Rejected(rejection),
        };

        if let Err(err) = self.store.insert(&record).await {
            warn!(error = %err, "consultation insert failed");
            return SubmissionOutcome::PersistenceFailed(err);
        }
        info!(email = %record.email, "consultation saved");

        let outcome = match self.gateway.notify(&request).await {
            Err(err) if err.is_rate_limited() => {
                warn!(error = %err, "dispatcher rate limited the submission");
                SubmissionOutcome::RateLimited(err)
            }
            Err(err) => {
                warn!(error = %err, "dispatcher call failed after save");
                SubmissionOutcome::NotificationDegraded(err)
            }
            Ok(report) if !report.email_status.admin_email => {
                warn!(
                    admin_error = report.email_status.admin_error.as_deref().unwrap_or(""),
                    "admin notification failed"
                );
                SubmissionOutcome::AdminNotificationFailed
            }
            Ok(_) => SubmissionOutcome::Delivered,
        };

        if matches!(outcome, SubmissionOutcome::Delivered) {
            form.clear();
        }
        outcome
    }
}
