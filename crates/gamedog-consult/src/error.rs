use crate::config::ConfigError;
use crate::consultation::PayloadRejection;
use crate::telemetry::TelemetryError;

/// Failure surfaced by the service binary's commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("consultation rejected: {0}")]
    Rejected(#[from] PayloadRejection),
}
