use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    constants::PRIORITY_MESSAGE_TYPES,
    errors::{new_validation_error, AppError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    General,
    ProjectInquiry,
    JobOpportunity,
    Collaboration,
    Other,
}

impl MessageType {
    pub const ALL: [MessageType; 5] = [
        Self::General,
        Self::ProjectInquiry,
        Self::JobOpportunity,
        Self::Collaboration,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::General => "general",
            MessageType::ProjectInquiry => "project_inquiry",
            MessageType::JobOpportunity => "job_opportunity",
            MessageType::Collaboration => "collaboration",
            MessageType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageType::General => "General Inquiry",
            MessageType::ProjectInquiry => "Project Inquiry",
            MessageType::JobOpportunity => "Job Opportunity",
            MessageType::Collaboration => "Collaboration",
            MessageType::Other => "Other",
        }
    }

    pub fn is_priority(&self) -> bool {
        PRIORITY_MESSAGE_TYPES.contains(&self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ContactMessageRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: String,
    pub read: bool,
    pub replied: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub priority: bool,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: MessageType,
    pub read: bool,
    pub replied: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub priority: bool,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transport metadata recorded with each submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: MessageType,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub priority: bool,
}

impl ContactMessageInsert {
    pub fn into_contact_message(self, id: i64, now: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            message_type: self.message_type,
            read: false,
            replied: false,
            read_at: None,
            replied_at: None,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            priority: self.priority,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ContactMessage {
    pub fn message_type_label(&self) -> &'static str {
        self.message_type.label()
    }

    /// First `length` characters of the message, with an ellipsis when cut.
    pub fn snippet(&self, length: usize) -> String {
        if self.message.chars().count() > length {
            let cut: String = self.message.chars().take(length).collect();
            format!("{}...", cut)
        } else {
            self.message.clone()
        }
    }

    pub fn from_name_and_email(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn to_response(&self) -> ContactMessageResponse {
        ContactMessageResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message_type: self.message_type,
            message_type_label: self.message_type_label().to_string(),
            priority: self.priority,
            created_at: self.created_at,
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message_type: MessageType,
    pub message_type_label: String,
    pub priority: bool,
    pub created_at: DateTime<Utc>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct NewContactMessageRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 255), email)]
    pub email: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 5, max = 200))]
    pub subject: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 10, max = 2000))]
    pub message: String,

    #[validate(custom(function = "validate_message_type"))]
    pub message_type: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts the form fields either bare or nested under `contact_message`.
/// The nested form is chosen whenever that key is present.
#[derive(Debug)]
pub enum ContactMessagePayload {
    Wrapped { contact_message: NewContactMessageRequest },
    Bare(NewContactMessageRequest),
}

impl<'de> Deserialize<'de> for ContactMessagePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;

        match body.remove("contact_message") {
            Some(inner) => serde_json::from_value(inner)
                .map(|contact_message| ContactMessagePayload::Wrapped { contact_message })
                .map_err(de::Error::custom),
            None => serde_json::from_value(serde_json::Value::Object(body))
                .map(ContactMessagePayload::Bare)
                .map_err(de::Error::custom),
        }
    }
}

impl ContactMessagePayload {
    pub fn into_request(self) -> NewContactMessageRequest {
        match self {
            ContactMessagePayload::Wrapped { contact_message } => contact_message,
            ContactMessagePayload::Bare(request) => request,
        }
    }
}

fn validate_message_type(value: &str) -> Result<(), ValidationError> {
    MessageType::from_str(value)
        .map(|_| ())
        .map_err(|_| new_validation_error("inclusion", "is not included in the list"))
}

impl NewContactMessageRequest {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.message = self.message.trim().to_string();
        self.message_type = self
            .message_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| Some(MessageType::General.as_str().to_string()));
        self
    }

    /// Validates the form and stamps the derived priority and client metadata.
    pub fn into_insert(self, client: ClientInfo) -> Result<ContactMessageInsert, ValidationErrors> {
        let value = self.normalized();
        value.validate()?;

        let message_type = value
            .message_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();

        Ok(ContactMessageInsert {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
            priority: MessageType::is_priority(&message_type),
            message_type,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
        })
    }
}

impl TryFrom<ContactMessageRow> for ContactMessage {
    type Error = AppError;

    fn try_from(row: ContactMessageRow) -> Result<Self, Self::Error> {
        let message_type = row.message_type.parse().map_err(|_| {
            AppError::InternalError(format!(
                "contact message {} has unknown type {:?}",
                row.id, row.message_type
            ))
        })?;

        Ok(ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            message_type,
            read: row.read,
            replied: row.replied,
            read_at: row.read_at,
            replied_at: row.replied_at,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            priority: row.priority,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
