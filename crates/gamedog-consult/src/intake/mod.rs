//! Form-side submission flow: validate, persist, then ask the dispatcher to
//! send notifications, and turn the result into a single toast.

pub mod controller;
pub mod form;
pub mod gateway;
pub mod store;

pub use controller::{ConsultationController, SubmissionOutcome, Toast, ToastVariant};
pub use form::ConsultationForm;
pub use gateway::{GatewayError, HttpNotificationGateway, NotificationGateway};
pub use store::{ConsultationStore, StoreError, SupabaseStore};
