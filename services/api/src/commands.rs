use crate::infra::mail_profile;
use chrono::Utc;
use clap::{Args, ValueEnum};
use gamedog_consult::config::AppConfig;
use gamedog_consult::consultation::{check_payload, sanitize, ConsultationRequest};
use gamedog_consult::error::AppError;
use gamedog_consult::intake::{
    ConsultationController, ConsultationForm, HttpNotificationGateway, SupabaseStore,
    ToastVariant,
};
use gamedog_consult::notify::templates::{admin_notification, user_acknowledgment};
use gamedog_consult::telemetry;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub(crate) struct ConsultationArgs {
    /// Full name of the athlete or parent
    #[arg(long)]
    pub(crate) name: String,
    /// Reply address for the acknowledgment email
    #[arg(long)]
    pub(crate) email: String,
    /// Optional phone number
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Optional primary sport (baseball, softball, football, basketball, track, soccer, other)
    #[arg(long)]
    pub(crate) sport: Option<String>,
    /// Goals and current training
    #[arg(long)]
    pub(crate) message: String,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    #[command(flatten)]
    pub(crate) consultation: ConsultationArgs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Audience {
    #[default]
    Admin,
    User,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    pub(crate) consultation: ConsultationArgs,
    /// Which notification to render
    #[arg(long, value_enum, default_value_t = Audience::Admin)]
    pub(crate) audience: Audience,
}

impl ConsultationArgs {
    fn into_form(self) -> ConsultationForm {
        ConsultationForm {
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            sport: self.sport.unwrap_or_default(),
            message: self.message,
            honeypot: String::new(),
        }
    }
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(SupabaseStore::from_config(&config.store)?);
    let gateway = Arc::new(HttpNotificationGateway::from_config(&config.store)?);
    let controller = ConsultationController::new(store, gateway, config.business.clone());

    let mut form = args.consultation.into_form();
    let outcome = controller.submit(&mut form).await;

    match outcome.toast(controller.business()) {
        Some(toast) => {
            let marker = match toast.variant {
                ToastVariant::Default => "ok",
                ToastVariant::Destructive => "error",
            };
            println!("[{marker}] {}", toast.title);
            println!("{}", toast.description);
        }
        None => println!("Submission dropped."),
    }
    println!(
        "Record persisted: {}",
        if outcome.is_persisted() { "yes" } else { "no" }
    );

    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let form = args.consultation.into_form();
    let request: ConsultationRequest = form.to_request();

    check_payload(&request)?;

    let consultation = sanitize(&request);
    let profile = mail_profile(&config);
    let email = match args.audience {
        Audience::Admin => admin_notification(&profile, &consultation, Utc::now()),
        Audience::User => user_acknowledgment(&profile, &consultation),
    };

    println!("From: {}", email.from);
    println!("To: {}", email.to);
    println!("Subject: {}", email.subject);
    println!();
    println!("{}", email.html);
    Ok(())
}
