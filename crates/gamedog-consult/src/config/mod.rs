use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DISPATCHER_FUNCTION_PATH: &str = "functions/v1/send-consultation-emails";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Production reads only the process environment; a stray `.env` on the
    /// host must not override deployed secrets.
    pub fn loads_dotenv(self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
    pub rate_limit: RateLimitConfig,
    pub store: StoreConfig,
    pub business: BusinessProfile,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let declared = env::var("APP_ENV").ok();
        if declared
            .as_deref()
            .map_or(true, |value| AppEnvironment::from_str(value).loads_dotenv())
        {
            dotenvy::dotenv().ok();
        }

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mail = MailConfig {
            api_key: optional_var("RESEND_API_KEY"),
            api_url: parse_url(
                "RESEND_API_URL",
                &env::var("RESEND_API_URL").unwrap_or_else(|_| DEFAULT_RESEND_API_URL.to_string()),
            )?,
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Game Dogs Sports <noreply@gamedogsports.com>".to_string()),
            admin_address: env::var("MAIL_ADMIN_TO")
                .unwrap_or_else(|_| "ContactcarolinaGD@gmail.com".to_string()),
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_number("RATE_LIMIT_MAX", 5)?,
            window: Duration::from_secs(parse_number("RATE_LIMIT_WINDOW_SECS", 3600)?),
        };

        let supabase_url = optional_var("SUPABASE_URL")
            .map(|raw| parse_url("SUPABASE_URL", &raw))
            .transpose()?;
        let dispatcher_url = optional_var("DISPATCHER_URL")
            .map(|raw| parse_url("DISPATCHER_URL", &raw))
            .transpose()?;
        let store = StoreConfig {
            supabase_url,
            anon_key: optional_var("SUPABASE_ANON_KEY"),
            table: env::var("CONSULTATIONS_TABLE").unwrap_or_else(|_| "consultations".to_string()),
            dispatcher_url,
        };

        let business = BusinessProfile {
            name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Game Dogs Sports".to_string()),
            phone: env::var("BUSINESS_PHONE").unwrap_or_else(|_| "910-638-4342".to_string()),
            email: env::var("BUSINESS_EMAIL")
                .unwrap_or_else(|_| "ContactcarolinaGD@gmail.com".to_string()),
            address: env::var("BUSINESS_ADDRESS")
                .unwrap_or_else(|_| "1122 Hawkins Ave, Sanford, NC 27330".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail,
            rate_limit,
            store,
            business,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var: name }),
        None => Ok(default),
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { var: name, source })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Transactional email provider settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: Url,
    pub from_address: String,
    pub admin_address: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60 * 60),
        }
    }
}

/// Hosted database and dispatcher endpoints used by the form controller.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub supabase_url: Option<Url>,
    pub anon_key: Option<String>,
    pub table: String,
    pub dispatcher_url: Option<Url>,
}

impl StoreConfig {
    pub fn require_supabase_url(&self) -> Result<&Url, ConfigError> {
        self.supabase_url
            .as_ref()
            .ok_or(ConfigError::Missing { var: "SUPABASE_URL" })
    }

    pub fn require_anon_key(&self) -> Result<&str, ConfigError> {
        self.anon_key
            .as_deref()
            .ok_or(ConfigError::Missing {
                var: "SUPABASE_ANON_KEY",
            })
    }

    /// Explicit `DISPATCHER_URL`, or the edge function path under `SUPABASE_URL`.
    pub fn resolve_dispatcher_url(&self) -> Result<Url, ConfigError> {
        if let Some(url) = &self.dispatcher_url {
            return Ok(url.clone());
        }

        let base = self.require_supabase_url()?;
        join_path(base, DISPATCHER_FUNCTION_PATH).map_err(|source| ConfigError::InvalidUrl {
            var: "SUPABASE_URL",
            source,
        })
    }

    pub fn table_url(&self) -> Result<Url, ConfigError> {
        let base = self.require_supabase_url()?;
        join_path(base, &format!("rest/v1/{}", self.table)).map_err(|source| {
            ConfigError::InvalidUrl {
                var: "SUPABASE_URL",
                source,
            }
        })
    }
}

pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}

/// Contact details rendered verbatim into emails and toast copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Game Dogs Sports".to_string(),
            phone: "910-638-4342".to_string(),
            email: "ContactcarolinaGD@gmail.com".to_string(),
            address: "1122 Hawkins Ave, Sanford, NC 27330".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        var: &'static str,
    },
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },
    Missing {
        var: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
            ConfigError::InvalidUrl { var, .. } => write!(f, "{var} must be an absolute URL"),
            ConfigError::Missing { var } => write!(f, "{var} is required but not set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidUrl { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::Missing { .. } => None,
        }
    }
}
