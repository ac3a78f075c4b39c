use super::domain::{present, ConsultationRequest, SanitizedConsultation};

/// Escapes the characters that could open or close markup inside an email
/// body, then trims. Ampersands are left alone.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped.trim().to_string()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Only call on payloads that already passed validation.
pub fn sanitize(request: &ConsultationRequest) -> SanitizedConsultation {
    SanitizedConsultation {
        name: escape_html(&request.name),
        email: normalize_email(&request.email),
        phone: present(request.phone.as_deref()).map(escape_html),
        sport: present(request.sport.as_deref()).map(escape_html),
        message: escape_html(&request.message),
    }
}
