//! Field rules for consultation requests.
//!
//! The form controller and the dispatcher check the same fields with slightly
//! different phone bounds and messages. Both run the honeypot check first.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{present, ConsultationRecord, ConsultationRequest, Sport};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 2000;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn within(len: usize, min: usize, max: usize) -> bool {
    (min..=max).contains(&len)
}

/// Reasons the form controller refuses to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormRejection {
    /// Bot signal. Never surfaced to the visitor.
    #[error("honeypot field was filled")]
    Honeypot,
    #[error("Please fill out all required fields.")]
    MissingInformation,
    #[error("Name must be between 2 and 100 characters.")]
    InvalidName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Message must be between 10 and 2000 characters.")]
    InvalidMessage,
    #[error("Please enter a valid phone number with at least 10 digits.")]
    InvalidPhone,
    #[error("Please choose a sport from the list.")]
    InvalidSport,
}

impl FormRejection {
    pub fn title(self) -> &'static str {
        match self {
            FormRejection::Honeypot => "Submission Blocked",
            FormRejection::MissingInformation => "Missing Information",
            FormRejection::InvalidName => "Invalid Name",
            FormRejection::InvalidEmail => "Invalid Email",
            FormRejection::InvalidMessage => "Invalid Message",
            FormRejection::InvalidPhone => "Invalid Phone",
            FormRejection::InvalidSport => "Invalid Sport",
        }
    }

    pub fn is_silent(self) -> bool {
        matches!(self, FormRejection::Honeypot)
    }
}

/// Client-side checks, in order. Returns the row to persist on success.
pub fn check_form(request: &ConsultationRequest) -> Result<ConsultationRecord, FormRejection> {
    if request
        .honeypot
        .as_deref()
        .is_some_and(|value| !value.is_empty())
    {
        return Err(FormRejection::Honeypot);
    }

    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(FormRejection::MissingInformation);
    }

    if !within(char_len(name), NAME_MIN, NAME_MAX) {
        return Err(FormRejection::InvalidName);
    }

    if !is_valid_email(email) {
        return Err(FormRejection::InvalidEmail);
    }

    if !within(char_len(message), MESSAGE_MIN, MESSAGE_MAX) {
        return Err(FormRejection::InvalidMessage);
    }

    let phone = present(request.phone.as_deref());
    if let Some(phone) = phone {
        if phone_digit_count(phone) < PHONE_MIN_DIGITS {
            return Err(FormRejection::InvalidPhone);
        }
    }

    let sport = present(request.sport.as_deref())
        .map(|raw| raw.parse::<Sport>())
        .transpose()
        .map_err(|_| FormRejection::InvalidSport)?;

    Ok(ConsultationRecord {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.map(str::to_string),
        sport,
        message: message.to_string(),
    })
}

/// Reasons the dispatcher rejects a payload with a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadRejection {
    #[error("Invalid submission")]
    Spam,
    #[error("Missing required fields: name, email, message")]
    MissingFields,
    #[error("Name must be between 2 and 100 characters")]
    NameLength,
    #[error("Message must be between 10 and 2000 characters")]
    MessageLength,
    #[error("Invalid email format")]
    EmailFormat,
    #[error("Invalid phone number format")]
    PhoneFormat,
}

/// Server-side checks. The dispatcher may be called without the form, so it
/// trusts nothing the controller already verified.
pub fn check_payload(request: &ConsultationRequest) -> Result<(), PayloadRejection> {
    if present(request.honeypot.as_deref()).is_some() {
        return Err(PayloadRejection::Spam);
    }

    let name = request.name.trim();
    let email = request.email.trim();
    let message = request.message.trim();
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(PayloadRejection::MissingFields);
    }

    if !within(char_len(name), NAME_MIN, NAME_MAX) {
        return Err(PayloadRejection::NameLength);
    }

    if !within(char_len(message), MESSAGE_MIN, MESSAGE_MAX) {
        return Err(PayloadRejection::MessageLength);
    }

    if !is_valid_email(email) {
        return Err(PayloadRejection::EmailFormat);
    }

    if let Some(phone) = present(request.phone.as_deref()) {
        if !within(phone_digit_count(phone), PHONE_MIN_DIGITS, PHONE_MAX_DIGITS) {
            return Err(PayloadRejection::PhoneFormat);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ConsultationRequest {
        ConsultationRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            ..ConsultationRequest::default()
        }
    }

    fn valid() -> ConsultationRequest {
        request(
            "Jo",
            "jo@example.com",
            "Looking to improve my sprint speed this offseason.",
        )
    }

    #[test]
    fn email_pattern_requires_local_domain_and_tld() {
        assert!(is_valid_email("jo@example.com"));
        assert!(is_valid_email("  coach.d@sub.team.org "));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("jo@example"));
        assert!(!is_valid_email("jo @example.com"));
        assert!(!is_valid_email("jo@@example.com"));
    }

    #[test]
    fn form_accepts_minimal_valid_request() {
        let record = check_form(&valid()).expect("valid form");
        assert_eq!(record.name, "Jo");
        assert!(record.phone.is_none());
        assert!(record.sport.is_none());
    }

    #[test]
    fn form_honeypot_wins_over_every_other_check() {
        let mut spam = request("", "", "");
        spam.honeypot = Some("http://spam.example".to_string());
        assert_eq!(check_form(&spam), Err(FormRejection::Honeypot));
        assert!(FormRejection::Honeypot.is_silent());
    }

    #[test]
    fn form_reports_missing_before_length_checks() {
        assert_eq!(
            check_form(&request("   ", "jo@example.com", "Long enough message")),
            Err(FormRejection::MissingInformation)
        );
    }

    #[test]
    fn form_name_check_precedes_email_and_message() {
        let rejection = check_form(&request("A", "bad-email", "hi")).expect_err("invalid");
        assert_eq!(rejection, FormRejection::InvalidName);
        assert_eq!(rejection.title(), "Invalid Name");
    }

    #[test]
    fn form_name_bounds_use_trimmed_length() {
        assert_eq!(
            check_form(&request(" J ", "jo@example.com", "Long enough message")),
            Err(FormRejection::InvalidName)
        );
        let long_name = "n".repeat(101);
        assert_eq!(
            check_form(&request(&long_name, "jo@example.com", "Long enough message")),
            Err(FormRejection::InvalidName)
        );
        let max_name = "n".repeat(100);
        assert!(check_form(&request(&max_name, "jo@example.com", "Long enough message")).is_ok());
    }

    #[test]
    fn form_message_bounds() {
        assert_eq!(
            check_form(&request("Jo", "jo@example.com", "too short")),
            Err(FormRejection::InvalidMessage)
        );
        let long_message = "m".repeat(2001);
        assert_eq!(
            check_form(&request("Jo", "jo@example.com", &long_message)),
            Err(FormRejection::InvalidMessage)
        );
        assert!(check_form(&request("Jo", "jo@example.com", "exactly 10")).is_ok());
    }

    #[test]
    fn form_phone_needs_ten_digits_when_present() {
        let mut short = valid();
        short.phone = Some("555-1234".to_string());
        assert_eq!(check_form(&short), Err(FormRejection::InvalidPhone));

        let mut blank = valid();
        blank.phone = Some("   ".to_string());
        assert!(check_form(&blank).expect("blank phone ignored").phone.is_none());

        let mut formatted = valid();
        formatted.phone = Some("(910) 638-4342".to_string());
        let record = check_form(&formatted).expect("formatted phone accepted");
        assert_eq!(record.phone.as_deref(), Some("(910) 638-4342"));
    }

    #[test]
    fn form_rejects_unknown_sport() {
        let mut unknown = valid();
        unknown.sport = Some("curling".to_string());
        assert_eq!(check_form(&unknown), Err(FormRejection::InvalidSport));

        let mut known = valid();
        known.sport = Some("track".to_string());
        assert_eq!(
            check_form(&known).expect("known sport").sport,
            Some(Sport::Track)
        );
    }

    #[test]
    fn payload_spam_uses_trimmed_honeypot() {
        let mut whitespace = valid();
        whitespace.honeypot = Some("  ".to_string());
        assert_eq!(check_payload(&whitespace), Ok(()));

        let mut spam = valid();
        spam.honeypot = Some("bot".to_string());
        assert_eq!(check_payload(&spam), Err(PayloadRejection::Spam));
    }

    #[test]
    fn payload_blank_required_fields_are_missing() {
        let blanks = [
            request("   ", "jo@example.com", "Looking to improve my sprint speed."),
            request("Jo", " \t ", "Looking to improve my sprint speed."),
            request("Jo", "jo@example.com", "\n  "),
            request("", "", ""),
        ];
        for blank in &blanks {
            assert_eq!(check_payload(blank), Err(PayloadRejection::MissingFields));
        }

        let mut spam = request("", "", "");
        spam.honeypot = Some("bot".to_string());
        assert_eq!(check_payload(&spam), Err(PayloadRejection::Spam));
    }

    #[test]
    fn payload_checks_message_before_email() {
        assert_eq!(
            check_payload(&request("Jo", "bad-email", "short")),
            Err(PayloadRejection::MessageLength)
        );
        assert_eq!(
            check_payload(&request("Jo", "bad-email", "Long enough message")),
            Err(PayloadRejection::EmailFormat)
        );
    }

    #[test]
    fn payload_phone_digits_bounded_both_ways() {
        let mut long = valid();
        long.phone = Some("+1 910 638 4342 0000 1".to_string());
        assert_eq!(check_payload(&long), Err(PayloadRejection::PhoneFormat));

        let mut ok = valid();
        ok.phone = Some("+1 910 638 4342".to_string());
        assert_eq!(check_payload(&ok), Ok(()));
    }

    #[test]
    fn payload_messages_match_wire_contract() {
        assert_eq!(
            PayloadRejection::MissingFields.to_string(),
            "Missing required fields: name, email, message"
        );
        assert_eq!(PayloadRejection::Spam.to_string(), "Invalid submission");
    }
}
