//! Consultation request model shared by the intake form and the dispatcher.

pub mod domain;
pub mod sanitize;
pub mod validation;

pub use domain::{ConsultationRecord, ConsultationRequest, SanitizedConsultation, Sport, UnknownSport};
pub use sanitize::{escape_html, normalize_email, sanitize};
pub use validation::{check_form, check_payload, is_valid_email, FormRejection, PayloadRejection};
