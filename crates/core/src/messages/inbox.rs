use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{ContactMessage, MessageValidationError, NewContactMessage};

#[derive(Debug, Error)]
pub enum InboxError {
    #[error("message {0} not found")]
    NotFound(Uuid),

    #[error("invalid message: {0}")]
    Invalid(#[from] MessageValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage for contact-form messages.
#[async_trait]
pub trait MessageInbox: Send + Sync {
    /// Validate and store a public submission.
    async fn submit(&self, message: NewContactMessage) -> Result<ContactMessage, InboxError>;

    /// All messages, newest first.
    async fn list(&self) -> Result<Vec<ContactMessage>, InboxError>;

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<ContactMessage, InboxError>;

    async fn toggle_read(&self, id: Uuid) -> Result<ContactMessage, InboxError>;

    async fn delete(&self, id: Uuid) -> Result<(), InboxError>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), InboxError>;
}
