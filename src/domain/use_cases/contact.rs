use std::sync::Arc;

use crate::{
    background_task::{NotificationKind, NotificationOutbox},
    entities::contact_message::{ClientInfo, ContactMessage, ContactMessageResponse, NewContactMessageRequest},
    errors::AppError,
    mailer::templates,
    repositories::contact_message::ContactMessageRepository,
    settings::AppConfig,
};

#[derive(Clone)]
pub struct ContactHandler {
    pub contact_repo: Arc<dyn ContactMessageRepository>,
    pub outbox: NotificationOutbox,
    config: Arc<AppConfig>,
}

impl ContactHandler {
    pub fn new(
        contact_repo: Arc<dyn ContactMessageRepository>,
        outbox: NotificationOutbox,
        config: Arc<AppConfig>,
    ) -> Self {
        ContactHandler { contact_repo, outbox, config }
    }

    /// Stores the submission, then queues the admin alert and the auto-reply.
    /// Notification problems never fail the submission.
    pub async fn create_contact_message(
        &self,
        request: NewContactMessageRequest,
        client: ClientInfo,
    ) -> Result<ContactMessageResponse, AppError> {
        let insert = request.into_insert(client)?;
        let message = self.contact_repo.create_contact_message(&insert).await?;

        tracing::info!(
            contact_message_id = message.id,
            message_type = %message.message_type,
            priority = message.priority,
            "Contact message received"
        );

        self.outbox.enqueue_contact_notifications(&message, &self.config);

        Ok(message.to_response())
    }

    pub async fn mark_as_read(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.contact_repo.mark_as_read(id).await?.ok_or_else(not_found)
    }

    pub async fn mark_as_replied(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.contact_repo.mark_as_replied(id).await?.ok_or_else(not_found)
    }

    pub async fn mark_as_unread(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.contact_repo.mark_as_unread(id).await?.ok_or_else(not_found)
    }

    /// Queues a reply to the sender and records the message as replied.
    pub async fn reply(&self, id: i64, reply: &str) -> Result<ContactMessage, AppError> {
        if reply.trim().is_empty() {
            return Err(AppError::validation("Reply can't be blank"));
        }

        let message = self.contact_repo.get_contact_message(id).await?.ok_or_else(not_found)?;
        self.outbox.enqueue(
            NotificationKind::CustomReply,
            message.id,
            templates::custom_reply(&message, reply, &self.config),
        );

        self.mark_as_replied(id).await
    }

    pub async fn unread_count(&self) -> Result<i64, AppError> {
        self.contact_repo.unread_count().await
    }

    pub async fn priority_count(&self) -> Result<i64, AppError> {
        self.contact_repo.priority_count().await
    }
}

fn not_found() -> AppError {
    AppError::not_found("Contact message")
}
