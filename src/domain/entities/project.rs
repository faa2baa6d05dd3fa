use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::list_field::comma_list,
    errors::{new_validation_error, AppError},
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 100;
const MIN_DESCRIPTION_LENGTH: u64 = 10;
const MAX_DESCRIPTION_LENGTH: u64 = 1000;
const MAX_SHORT_DESCRIPTION_LENGTH: u64 = 200;

// ───── Enumerations ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Completed, Self::InProgress, Self::Planned];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Planned => "planned",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial ranking of a project. Unrelated to contact-message priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl ProjectPriority {
    pub const ALL: [ProjectPriority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPriority::High => "high",
            ProjectPriority::Medium => "medium",
            ProjectPriority::Low => "low",
        }
    }
}

impl FromStr for ProjectPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

impl fmt::Display for ProjectPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub github_url: String,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
    pub status: String,
    pub priority: String,
    pub published: bool,
    pub featured: bool,
    pub view_count: i64,
    pub completed_at: Option<NaiveDate>,
    pub challenges: Option<String>,
    pub learnings: Option<String>,
    pub future_improvements: Option<String>,
    pub featured_image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub github_url: String,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub published: bool,
    pub featured: bool,
    pub view_count: i64,
    pub completed_at: Option<NaiveDate>,
    pub challenges: Option<String>,
    pub learnings: Option<String>,
    pub future_improvements: Option<String>,
    pub featured_image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated values ready to be written.
#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub github_url: String,
    pub live_url: Option<String>,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub published: bool,
    pub featured: bool,
    pub completed_at: Option<NaiveDate>,
    pub challenges: Option<String>,
    pub learnings: Option<String>,
    pub future_improvements: Option<String>,
    pub featured_image_url: Option<String>,
    pub image_urls: Vec<String>,
}

impl ProjectInsert {
    pub fn into_project(self, id: i64, now: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            short_description: self.short_description,
            github_url: self.github_url,
            live_url: self.live_url,
            technologies: self.technologies,
            status: self.status,
            priority: self.priority,
            published: self.published,
            featured: self.featured,
            view_count: 0,
            completed_at: self.completed_at,
            challenges: self.challenges,
            learnings: self.learnings,
            future_improvements: self.future_improvements,
            featured_image_url: self.featured_image_url,
            image_urls: self.image_urls,
            created_at: now,
            updated_at: now,
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub github_url: String,
    pub live_url: Option<String>,
    pub technologies_list: Vec<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub featured: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub featured_image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub summary: ProjectListResponse,
    pub description: String,
    pub challenges: Option<String>,
    pub learnings: Option<String>,
    pub future_improvements: Option<String>,
    pub completed_at: Option<NaiveDate>,
    pub image_urls: Vec<String>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct NewProjectRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, max = MAX_SHORT_DESCRIPTION_LENGTH))]
    pub short_description: String,

    #[validate(custom(function = "validate_url"))]
    pub github_url: String,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[serde(deserialize_with = "comma_list")]
    pub technologies: Vec<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,

    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub completed_at: Option<NaiveDate>,
    pub challenges: Option<String>,
    pub learnings: Option<String>,
    pub future_improvements: Option<String>,
    pub featured_image_url: Option<String>,
    pub image_urls: Vec<String>,
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(new_validation_error("invalid_url", "is invalid")),
    }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    ProjectStatus::from_str(value)
        .map(|_| ())
        .map_err(|_| new_validation_error("inclusion", "is not included in the list"))
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    ProjectPriority::from_str(value)
        .map(|_| ())
        .map_err(|_| new_validation_error("inclusion", "is not included in the list"))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl NewProjectRequest {
    /// Blank optional text counts as absent, as do blank enum values.
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.short_description = self.short_description.trim().to_string();
        self.github_url = self.github_url.trim().to_string();
        self.live_url = blank_to_none(self.live_url);
        self.status = blank_to_none(self.status);
        self.priority = blank_to_none(self.priority);
        self.challenges = blank_to_none(self.challenges);
        self.learnings = blank_to_none(self.learnings);
        self.future_improvements = blank_to_none(self.future_improvements);
        self.featured_image_url = blank_to_none(self.featured_image_url);
        self
    }
}

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewProjectRequest) -> Result<Self, Self::Error> {
        let value = value.normalized();
        value.validate()?;

        Ok(ProjectInsert {
            title: value.title,
            description: value.description,
            short_description: value.short_description,
            github_url: value.github_url,
            live_url: value.live_url,
            technologies: value.technologies,
            status: value.status.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default(),
            priority: value.priority.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default(),
            published: value.published.unwrap_or(true),
            featured: value.featured.unwrap_or(false),
            completed_at: value.completed_at,
            challenges: value.challenges,
            learnings: value.learnings,
            future_improvements: value.future_improvements,
            featured_image_url: value.featured_image_url,
            image_urls: value.image_urls,
        })
    }
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            AppError::InternalError(format!("project {} has unknown status {:?}", row.id, row.status))
        })?;
        let priority = row.priority.parse().map_err(|_| {
            AppError::InternalError(format!("project {} has unknown priority {:?}", row.id, row.priority))
        })?;

        Ok(Project {
            id: row.id,
            title: row.title,
            description: row.description,
            short_description: row.short_description,
            github_url: row.github_url,
            live_url: row.live_url,
            technologies: row.technologies,
            status,
            priority,
            published: row.published,
            featured: row.featured,
            view_count: row.view_count,
            completed_at: row.completed_at,
            challenges: row.challenges,
            learnings: row.learnings,
            future_improvements: row.future_improvements,
            featured_image_url: row.featured_image_url,
            image_urls: row.image_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Project {
    pub fn to_list_response(&self) -> ProjectListResponse {
        ProjectListResponse {
            id: self.id,
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            technologies_list: self.technologies.clone(),
            status: self.status,
            priority: self.priority,
            featured: self.featured,
            view_count: self.view_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            featured_image_url: self.featured_image_url.clone(),
        }
    }

    pub fn to_detail_response(&self) -> ProjectDetailResponse {
        ProjectDetailResponse {
            summary: self.to_list_response(),
            description: self.description.clone(),
            challenges: self.challenges.clone(),
            learnings: self.learnings.clone(),
            future_improvements: self.future_improvements.clone(),
            completed_at: self.completed_at,
            image_urls: self.image_urls.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::full_messages;

    pub(crate) fn valid_request() -> NewProjectRequest {
        NewProjectRequest {
            title: "Portfolio API".into(),
            description: "A JSON API serving portfolio content.".into(),
            short_description: "Portfolio backend service".into(),
            github_url: "https://github.com/example/portfolio".into(),
            technologies: vec!["Rust".into(), "Actix".into()],
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply_when_enums_are_absent() {
        let insert = ProjectInsert::try_from(valid_request()).unwrap();
        assert_eq!(insert.status, ProjectStatus::Completed);
        assert_eq!(insert.priority, ProjectPriority::Medium);
        assert!(insert.published);
        assert!(!insert.featured);
    }

    #[test]
    fn invalid_status_and_priority_are_rejected() {
        let request = NewProjectRequest {
            status: Some("archived".into()),
            priority: Some("urgent".into()),
            ..valid_request()
        };
        let messages = full_messages(&ProjectInsert::try_from(request).unwrap_err());
        assert!(messages.contains(&"Status is not included in the list".to_string()));
        assert!(messages.contains(&"Priority is not included in the list".to_string()));
    }

    #[test]
    fn urls_must_use_http_or_https() {
        let request = NewProjectRequest {
            github_url: "ftp://example.com/repo".into(),
            live_url: Some("not a url".into()),
            ..valid_request()
        };
        let messages = full_messages(&ProjectInsert::try_from(request).unwrap_err());
        assert!(messages.contains(&"Github url is invalid".to_string()));
        assert!(messages.contains(&"Live url is invalid".to_string()));
    }

    #[test]
    fn blank_live_url_is_treated_as_absent() {
        let request = NewProjectRequest { live_url: Some("  ".into()), ..valid_request() };
        let insert = ProjectInsert::try_from(request).unwrap();
        assert_eq!(insert.live_url, None);
    }

    #[test]
    fn list_view_omits_long_form_fields() {
        let project = ProjectInsert::try_from(valid_request()).unwrap().into_project(7, Utc::now());
        let list = serde_json::to_value(project.to_list_response()).unwrap();
        assert!(list.get("description").is_none());
        assert!(list.get("image_urls").is_none());
        assert_eq!(list["technologies_list"], serde_json::json!(["Rust", "Actix"]));
        assert_eq!(list["status"], "completed");

        let detail = serde_json::to_value(project.to_detail_response()).unwrap();
        assert_eq!(detail["id"], 7);
        assert_eq!(detail["description"], "A JSON API serving portfolio content.");
        assert_eq!(detail["image_urls"], serde_json::json!([]));
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let request = NewProjectRequest {
            title: "    ".into(),
            description: " ".repeat(20),
            ..valid_request()
        };
        let messages = full_messages(&ProjectInsert::try_from(request).unwrap_err());
        assert_eq!(messages, vec!["Description can't be blank", "Title can't be blank"]);
    }

    #[test]
    fn title_is_stored_trimmed() {
        let request = NewProjectRequest { title: "  Portfolio API \n".into(), ..valid_request() };
        assert_eq!(ProjectInsert::try_from(request).unwrap().title, "Portfolio API");
    }
}
