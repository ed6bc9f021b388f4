use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::messages::MessageCategory;

/// Events emitted after successful changes, consumed by SSE listeners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SiteEvent {
    Welcome,
    ContentUpdated(ContentUpdatedEvent),
    ContentReset { timestamp: DateTime<Utc> },
    MessageReceived(MessageReceivedEvent),
    Reconnect,
}

impl SiteEvent {
    /// Name used for the SSE `event:` field.
    pub fn name(&self) -> &'static str {
        match self {
            SiteEvent::Welcome => "welcome",
            SiteEvent::ContentUpdated(_) => "contentUpdated",
            SiteEvent::ContentReset { .. } => "contentReset",
            SiteEvent::MessageReceived(_) => "messageReceived",
            SiteEvent::Reconnect => "reconnect",
        }
    }

    /// Whether anonymous site visitors may see this event. Inbox activity is
    /// admin-only.
    pub fn is_public(&self) -> bool {
        !matches!(self, SiteEvent::MessageReceived(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdatedEvent {
    pub version: u32,
    pub sections: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReceivedEvent {
    pub id: Uuid,
    pub category: MessageCategory,
    pub timestamp: DateTime<Utc>,
}
