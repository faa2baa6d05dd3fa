use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug)]
pub enum AppError {
    /// Field-level messages, already in their final human-readable form.
    ValidationError(Vec<String>),
    /// Carries the resource name, e.g. "Project".
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(messages) => {
                write!(f, "validation error: {}", messages.join(", "))
            }
            AppError::NotFound(resource) => write!(f, "{} not found", resource),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, errors: Vec<String>) -> Self {
        ErrorEnvelope {
            success: false,
            message: message.into(),
            errors,
        }
    }
}

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(resource.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            AppError::ValidationError(messages) => {
                ErrorEnvelope::new("Validation failed", messages.clone())
            }
            AppError::NotFound(resource) => ErrorEnvelope::new(
                format!("{} not found", resource),
                vec![format!("The requested {} could not be found", resource.to_lowercase())],
            ),
            AppError::BadRequest(msg) => ErrorEnvelope::new("Bad request", vec![msg.clone()]),
            AppError::InternalError(_) => ErrorEnvelope::new(INTERNAL_ERROR_MESSAGE, Vec::new()),
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalError(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(self.envelope())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(full_messages(&errors))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(e) if e.constraint() == Some("skills_name_lower_idx") => {
                AppError::validation("Name has already been taken")
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::validation("Record already exists")
            }
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Renders validator output as "<Field> <message>" lines, sorted by field so the
/// order is stable between requests.
pub fn full_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            let label = humanize(&field);
            errs.iter()
                .map(move |e| format!("{} {}", label, describe(e)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "length" => describe_length(error),
        "email" | "url" => "is invalid".to_string(),
        "range" => "is not included in the list".to_string(),
        _ => "is invalid".to_string(),
    }
}

fn describe_length(error: &ValidationError) -> String {
    let param = |name: &str| error.params.get(name).and_then(|v| v.as_u64());
    let length = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|s| s.chars().count() as u64);

    match (length, param("min"), param("max")) {
        (Some(0), _, _) => "can't be blank".to_string(),
        (Some(len), Some(min), _) if len < min => {
            format!("is too short (minimum is {} characters)", min)
        }
        (_, _, Some(max)) => format!("is too long (maximum is {} characters)", max),
        _ => "is the wrong length".to_string(),
    }
}

/// "github_url" -> "Github url"
pub fn humanize(field: &str) -> String {
    let spaced = field.trim_start_matches('_').replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Mail transport error: {_0}")]
    Transport(String),

    #[display("Mail relay rejected message with status {_0}")]
    Rejected(u16),
}

impl std::error::Error for MailError {}
