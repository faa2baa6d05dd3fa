use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{errors::MailError, settings::AppConfig};

pub mod templates;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Writes outgoing mail to the log instead of delivering it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            reply_to = ?email.reply_to,
            subject = %email.subject,
            "Email (log delivery):\n{}",
            email.text
        );
        Ok(())
    }
}

/// Delivers mail by POSTing it as JSON to a mail relay.
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(HttpMailer {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let mut request = self.client.post(&self.endpoint).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MailError::Rejected(status.as_u16()))
        }
    }
}

/// Picks the relay mailer when an endpoint is configured, the log mailer otherwise.
pub fn mailer_from_config(config: &AppConfig) -> Result<Box<dyn Mailer>, MailError> {
    match config.mailer_endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(endpoint) => {
            url::Url::parse(endpoint)
                .map_err(|e| MailError::Transport(format!("invalid mailer endpoint: {}", e)))?;
            tracing::info!("Mail delivery via relay at {}", endpoint);
            Ok(Box::new(HttpMailer::new(
                endpoint,
                config.mailer_api_key.clone(),
                config.mailer_timeout(),
            )?))
        }
        None => {
            tracing::info!("No mailer endpoint configured; emails will be logged");
            Ok(Box::new(LogMailer))
        }
    }
}
