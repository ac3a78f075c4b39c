use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::{ConfigError, StoreConfig};
use crate::consultation::ConsultationRecord;

/// Persistence failure. The controller reports all variants the same way.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("consultation store rejected the insert (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("consultation store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the controller can be exercised in isolation.
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    async fn insert(&self, record: &ConsultationRecord) -> Result<(), StoreError>;
}

/// PostgREST insert against the hosted `consultations` table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    table_url: Url,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(table_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            table_url,
            anon_key: anon_key.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.table_url()?, config.require_anon_key()?))
    }
}

#[async_trait]
impl ConsultationStore for SupabaseStore {
    async fn insert(&self, record: &ConsultationRecord) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|err| format!("unreadable error body: {err}"));
        Err(StoreError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
