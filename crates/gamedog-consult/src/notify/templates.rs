use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::mailer::OutboundEmail;
use crate::config::BusinessProfile;
use crate::consultation::SanitizedConsultation;

/// Addresses and copy used to build both notification emails.
#[derive(Debug, Clone)]
pub struct MailProfile {
    pub from_address: String,
    pub admin_address: String,
    pub business: BusinessProfile,
}

pub fn admin_subject(consultation: &SanitizedConsultation) -> String {
    format!("New Consultation Request from {}", consultation.name)
}

pub fn user_subject(business: &BusinessProfile) -> String {
    format!("Thank you for your consultation request - {}", business.name)
}

pub fn admin_notification(
    profile: &MailProfile,
    consultation: &SanitizedConsultation,
    submitted_at: DateTime<Utc>,
) -> OutboundEmail {
    OutboundEmail {
        from: profile.from_address.clone(),
        to: profile.admin_address.clone(),
        subject: admin_subject(consultation),
        html: render_admin_html(&profile.business, consultation, submitted_at),
    }
}

pub fn user_acknowledgment(
    profile: &MailProfile,
    consultation: &SanitizedConsultation,
) -> OutboundEmail {
    OutboundEmail {
        from: profile.from_address.clone(),
        to: consultation.email.clone(),
        subject: user_subject(&profile.business),
        html: render_user_html(&profile.business, consultation),
    }
}

fn detail_row(html: &mut String, label: &str, value: &str) {
    let _ = write!(
        html,
        r#"<p style="margin: 5px 0;"><strong>{label}:</strong> {value}</p>"#
    );
}

fn optional_rows(html: &mut String, consultation: &SanitizedConsultation) {
    if let Some(phone) = &consultation.phone {
        detail_row(html, "Phone", phone);
    }
    if let Some(sport) = &consultation.sport {
        detail_row(html, "Primary Sport", sport);
    }
}

pub fn render_admin_html(
    business: &BusinessProfile,
    consultation: &SanitizedConsultation,
    submitted_at: DateTime<Utc>,
) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">"#,
    );
    html.push_str(
        r#"<div style="background-color: #000; color: #fff; padding: 20px; text-align: center; border-radius: 8px 8px 0 0;"><h1 style="margin: 0; color: #fff;">New Consultation Request</h1></div>"#,
    );
    html.push_str(r#"<div style="background-color: #f5f5f5; padding: 30px; border-radius: 0 0 8px 8px;">"#);
    html.push_str(r#"<h2 style="color: #d32f2f; margin-top: 0;">Contact Details</h2>"#);
    html.push_str(
        r#"<div style="background-color: #fff; padding: 20px; border-radius: 6px; margin: 15px 0; border-left: 4px solid #d32f2f;">"#,
    );
    detail_row(&mut html, "Name", &consultation.name);
    detail_row(&mut html, "Email", &consultation.email);
    optional_rows(&mut html, consultation);
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<h3 style="color: #d32f2f;">Message:</h3><div style="background-color: #fff; padding: 20px; border-radius: 6px; border: 1px solid #ddd;"><p style="margin: 0; line-height: 1.6;">{}</p></div>"#,
        consultation.message
    );
    let _ = write!(
        html,
        r#"<div style="text-align: center; margin-top: 30px;"><a href="mailto:{email}" style="background-color: #d32f2f; color: #fff; padding: 12px 24px; text-decoration: none; border-radius: 6px; font-weight: bold;">Reply to {name}</a></div>"#,
        email = consultation.email,
        name = consultation.name
    );
    let _ = write!(
        html,
        r#"<hr style="margin: 30px 0; border: none; border-top: 1px solid #ddd;"><p style="font-size: 12px; color: #666; text-align: center;">This email was sent from your {business} website contact form.<br>Submitted on: {submitted}</p>"#,
        business = business.name,
        submitted = submitted_at.format("%B %-d, %Y at %-I:%M %p UTC")
    );
    html.push_str("</div></div>");
    html
}

pub fn render_user_html(business: &BusinessProfile, consultation: &SanitizedConsultation) -> String {
    let mut html = String::with_capacity(3072);
    html.push_str(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">"#,
    );
    let _ = write!(
        html,
        r#"<div style="background-color: #000; color: #fff; padding: 30px; text-align: center; border-radius: 8px 8px 0 0;"><h1 style="margin: 0; color: #fff; font-size: 32px; font-weight: bold;">{}</h1><p style="margin: 10px 0 0 0; color: #ccc;">Elite Athletic Training</p></div>"#,
        business.name
    );
    html.push_str(r#"<div style="background-color: #f5f5f5; padding: 40px; border-radius: 0 0 8px 8px;">"#);
    let _ = write!(
        html,
        r#"<h2 style="color: #d32f2f; margin-top: 0;">Thank You, {}!</h2>"#,
        consultation.name
    );
    html.push_str(
        r#"<p style="font-size: 16px; line-height: 1.6; margin-bottom: 20px;">We've received your consultation request and we're excited to help you reach your athletic potential.</p>"#,
    );
    html.push_str(
        r#"<div style="background-color: #fff; padding: 25px; border-radius: 6px; margin: 20px 0; border-left: 4px solid #d32f2f;"><h3 style="color: #d32f2f; margin-top: 0;">What happens next?</h3><ul style="padding-left: 20px; line-height: 1.8;">"#,
    );
    for (step, detail) in NEXT_STEPS {
        let _ = write!(html, "<li><strong>{step}:</strong> {detail}</li>");
    }
    html.push_str("</ul></div>");

    html.push_str(
        r#"<div style="background-color: #fff; padding: 20px; border-radius: 6px; margin: 20px 0;"><h4 style="color: #333; margin-top: 0;">Your submitted information:</h4>"#,
    );
    detail_row(&mut html, "Email", &consultation.email);
    optional_rows(&mut html, consultation);
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<div style="background-color: #e8f5e8; padding: 20px; border-radius: 6px; margin: 25px 0;"><p style="margin: 0; color: #2d5a2d;"><strong>Questions?</strong> Email us at {email}<br><strong>Urgent?</strong> Call us at {phone}</p></div>"#,
        email = business.email,
        phone = business.phone
    );
    let _ = write!(
        html,
        r#"<div style="text-align: center; margin-top: 30px;"><p style="color: #666; font-style: italic;">"Your championship journey starts now."</p><p style="margin: 20px 0 0 0; color: #999; font-size: 12px;">&copy; {name} | {address}</p></div>"#,
        name = business.name,
        address = business.address
    );
    html.push_str("</div></div>");
    html
}

const NEXT_STEPS: [(&str, &str); 3] = [
    (
        "Within 24 hours",
        "Our team will review your information and contact you to schedule your free consultation",
    ),
    (
        "During consultation",
        "We'll discuss your goals, assess your current level, and create a personalized training plan",
    ),
    (
        "Get started",
        "Begin your journey to becoming the athlete you're meant to be",
    ),
];
