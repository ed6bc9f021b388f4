use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// What a visitor is writing about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MessageCategory {
    #[default]
    #[serde(rename = "pedido_oracao")]
    PrayerRequest,
    #[serde(rename = "testemunho")]
    Testimony,
    #[serde(rename = "visita")]
    Visit,
    #[serde(rename = "outros")]
    Other,
}

impl MessageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::PrayerRequest => "pedido_oracao",
            MessageCategory::Testimony => "testemunho",
            MessageCategory::Visit => "visita",
            MessageCategory::Other => "outros",
        }
    }

    /// Label shown in the admin inbox.
    pub fn label(&self) -> &'static str {
        match self {
            MessageCategory::PrayerRequest => "Pedido de Oração",
            MessageCategory::Testimony => "Testemunho",
            MessageCategory::Visit => "Solicitar Visita",
            MessageCategory::Other => "Outros Assuntos",
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown values map to [`MessageCategory::Other`].
impl FromStr for MessageCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pedido_oracao" => MessageCategory::PrayerRequest,
            "testemunho" => MessageCategory::Testimony,
            "visita" => MessageCategory::Visit,
            _ => MessageCategory::Other,
        })
    }
}

impl<'de> Deserialize<'de> for MessageCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// A stored contact-form message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub category: MessageCategory,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A contact-form submission as sent by a visitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub category: MessageCategory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageValidationError {
    #[error("name is required")]
    MissingName,
    #[error("a valid email is required")]
    InvalidEmail,
    #[error("message cannot be empty")]
    EmptyMessage,
}

impl NewContactMessage {
    /// Trim fields, drop a blank phone and check the required ones.
    pub fn normalized(self) -> Result<Self, MessageValidationError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();
        let phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        if name.is_empty() {
            return Err(MessageValidationError::MissingName);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(MessageValidationError::InvalidEmail),
        }
        if message.is_empty() {
            return Err(MessageValidationError::EmptyMessage);
        }

        Ok(Self {
            name,
            email,
            phone,
            message,
            category: self.category,
        })
    }

    /// Build the stored record. Expects a normalized submission.
    pub fn into_message(self, id: Uuid, created_at: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            category: self.category,
            is_read: false,
            created_at,
        }
    }
}
