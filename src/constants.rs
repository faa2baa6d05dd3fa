use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const API_PREFIX: &str = "/api/v1";

pub const DEFAULT_PROJECTS_PER_PAGE: i64 = 12;
pub const MAX_PROJECTS_PER_PAGE: i64 = 50;

/// Message types whose submissions are flagged as priority.
pub const PRIORITY_MESSAGE_TYPES: [&str; 3] = ["job_opportunity", "collaboration", "project_inquiry"];
