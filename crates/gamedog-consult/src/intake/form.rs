use serde::{Deserialize, Serialize};

use crate::consultation::ConsultationRequest;

/// Raw field state as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub sport: String,
    pub message: String,
    /// Hidden from people; bots tend to fill it.
    pub honeypot: String,
}

impl ConsultationForm {
    /// Builds the payload sent to the dispatcher. Empty optional fields are
    /// omitted and the honeypot is always forwarded.
    pub fn to_request(&self) -> ConsultationRequest {
        ConsultationRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: non_empty(&self.phone),
            sport: non_empty(&self.sport),
            message: self.message.clone(),
            honeypot: Some(self.honeypot.clone()),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        self == &Self::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
