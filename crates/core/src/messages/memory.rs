use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::inbox::{InboxError, MessageInbox};
use super::model::{ContactMessage, NewContactMessage};

/// Inbox kept in process memory; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryInbox {
    messages: RwLock<Vec<ContactMessage>>,
}

impl MemoryInbox {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut ContactMessage),
    ) -> Result<ContactMessage, InboxError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(InboxError::NotFound(id))?;
        change(message);
        Ok(message.clone())
    }
}

#[async_trait]
impl MessageInbox for MemoryInbox {
    async fn submit(&self, message: NewContactMessage) -> Result<ContactMessage, InboxError> {
        let stored = message.normalized()?.into_message(Uuid::new_v4(), Utc::now());
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, InboxError> {
        let mut messages = self.messages.read().await.clone();
        // Stable sort over reversed insertion order keeps ties newest first.
        messages.reverse();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<ContactMessage, InboxError> {
        self.modify(id, |m| m.is_read = is_read).await
    }

    async fn toggle_read(&self, id: Uuid) -> Result<ContactMessage, InboxError> {
        self.modify(id, |m| m.is_read = !m.is_read).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), InboxError> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Err(InboxError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), InboxError> {
        Ok(())
    }
}
