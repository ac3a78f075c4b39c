use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire payload shared by the form controller and the notification dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<String>,
}

/// Primary sport options offered by the consultation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Baseball,
    Softball,
    Football,
    Basketball,
    Track,
    Soccer,
    Other,
}

impl Sport {
    pub const ALL: [Sport; 7] = [
        Sport::Baseball,
        Sport::Softball,
        Sport::Football,
        Sport::Basketball,
        Sport::Track,
        Sport::Soccer,
        Sport::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Baseball => "baseball",
            Sport::Softball => "softball",
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Track => "track",
            Sport::Soccer => "soccer",
            Sport::Other => "other",
        }
    }

    /// Human readable option text shown in the form select.
    pub fn label(self) -> &'static str {
        match self {
            Sport::Baseball => "Baseball",
            Sport::Softball => "Softball",
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Track => "Track & Field",
            Sport::Soccer => "Soccer",
            Sport::Other => "Other",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sport '{0}'")]
pub struct UnknownSport(pub String);

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == normalized)
            .ok_or_else(|| UnknownSport(value.to_string()))
    }
}

/// Row inserted into the `consultations` table. Never carries the honeypot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub sport: Option<Sport>,
    pub message: String,
}

/// Fields after HTML escaping, ready for interpolation into email markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedConsultation {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub sport: Option<String>,
    pub message: String,
}

/// Treats absent and blank optional fields the same way.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
