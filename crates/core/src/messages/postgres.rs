use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::inbox::{InboxError, MessageInbox};
use super::model::{ContactMessage, MessageCategory, NewContactMessage};

const COLUMNS: &str = "id, name, email, phone, message, category, is_read, created_at";

/// Inbox backed by the `contact_messages` table.
#[derive(Debug, Clone)]
pub struct PgInbox {
    pool: PgPool,
}

/// Database row representation of a message.
#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    category: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for ContactMessage {
    fn from(row: MessageRow) -> Self {
        ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            category: row.category.parse().unwrap_or(MessageCategory::Other),
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

impl PgInbox {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageInbox for PgInbox {
    async fn submit(&self, message: NewContactMessage) -> Result<ContactMessage, InboxError> {
        let message = message.normalized()?;
        let row: MessageRow = sqlx::query_as(&format!(
            "INSERT INTO contact_messages (id, name, email, phone, message, category) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.message)
        .bind(message.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id = %row.id, category = %row.category, "contact message stored");
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, InboxError> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM contact_messages ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<ContactMessage, InboxError> {
        let row: Option<MessageRow> = sqlx::query_as(&format!(
            "UPDATE contact_messages SET is_read = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(is_read)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Into::into).ok_or(InboxError::NotFound(id))
    }

    async fn toggle_read(&self, id: Uuid) -> Result<ContactMessage, InboxError> {
        let row: Option<MessageRow> = sqlx::query_as(&format!(
            "UPDATE contact_messages SET is_read = NOT is_read WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Into::into).ok_or(InboxError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), InboxError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(InboxError::NotFound(id));
        }
        tracing::info!(%id, "contact message deleted");
        Ok(())
    }

    async fn ping(&self) -> Result<(), InboxError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
