use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::contact_message::{ContactMessage, ContactMessageInsert, ContactMessageRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactMessageRepo,
};

/// Contact messages are write-only over HTTP; the read-state operations
/// serve administrative tooling.
#[async_trait]
pub trait ContactMessageRepository: Sync + Send {
    async fn create_contact_message(&self, message: &ContactMessageInsert) -> Result<ContactMessage, AppError>;
    async fn get_contact_message(&self, id: i64) -> Result<Option<ContactMessage>, AppError>;
    async fn mark_as_read(&self, id: i64) -> Result<Option<ContactMessage>, AppError>;
    async fn mark_as_replied(&self, id: i64) -> Result<Option<ContactMessage>, AppError>;
    async fn mark_as_unread(&self, id: i64) -> Result<Option<ContactMessage>, AppError>;
    async fn unread_count(&self) -> Result<i64, AppError>;
    /// Unread messages flagged as priority.
    async fn priority_count(&self) -> Result<i64, AppError>;
}

impl SqlxContactMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactMessageRepo { pool }
    }

    async fn update_returning(&self, sql: &str, id: i64) -> Result<Option<ContactMessage>, AppError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ContactMessage::try_from).transpose()
    }
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepo {
    async fn create_contact_message(&self, message: &ContactMessageInsert) -> Result<ContactMessage, AppError> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            INSERT INTO contact_messages (
                name, email, subject, message, message_type, ip_address, user_agent, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.message_type.as_str())
        .bind(&message.ip_address)
        .bind(&message.user_agent)
        .bind(message.priority)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_contact_message(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        let row = sqlx::query_as::<_, ContactMessageRow>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ContactMessage::try_from).transpose()
    }

    async fn mark_as_read(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        self.update_returning(
            r#"
            UPDATE contact_messages SET read = TRUE, read_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
            id,
        )
        .await
    }

    async fn mark_as_replied(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        self.update_returning(
            r#"
            UPDATE contact_messages SET replied = TRUE, replied_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
            id,
        )
        .await
    }

    async fn mark_as_unread(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        self.update_returning(
            r#"
            UPDATE contact_messages SET read = FALSE, read_at = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
            id,
        )
        .await
    }

    async fn unread_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE read = FALSE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn priority_count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE read = FALSE AND priority = TRUE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
