use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{new_validation_error, AppError};

static NON_ICON_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("static regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Design,
    Tools,
    Languages,
    Frameworks,
    Libraries,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 9] = [
        Self::Frontend,
        Self::Backend,
        Self::Database,
        Self::Devops,
        Self::Design,
        Self::Tools,
        Self::Languages,
        Self::Frameworks,
        Self::Libraries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Devops => "devops",
            SkillCategory::Design => "design",
            SkillCategory::Tools => "tools",
            SkillCategory::Languages => "languages",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Libraries => "libraries",
        }
    }

    /// Display name used by grouped listings, e.g. "Devops".
    pub fn label(&self) -> String {
        crate::errors::humanize(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct SkillRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub proficiency_level: i32,
    pub years_of_experience: f64,
    pub description: Option<String>,
    pub featured: bool,
    pub icon_url: Option<String>,
    pub color_code: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub years_of_experience: f64,
    pub description: Option<String>,
    pub featured: bool,
    pub icon_url: Option<String>,
    pub color_code: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub name: String,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub years_of_experience: f64,
    pub description: Option<String>,
    pub featured: bool,
    pub icon_url: Option<String>,
    pub color_code: Option<String>,
    pub sort_order: i32,
}

impl SkillInsert {
    pub fn into_skill(self, id: i64, now: DateTime<Utc>) -> Skill {
        Skill {
            id,
            name: self.name,
            category: self.category,
            proficiency_level: self.proficiency_level,
            years_of_experience: self.years_of_experience,
            description: self.description,
            featured: self.featured,
            icon_url: self.icon_url,
            color_code: self.color_code,
            sort_order: self.sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

// ───── Derived attributes ───────────────────────────────────────────

pub fn proficiency_percentage(level: i32) -> i32 {
    level.saturating_mul(10).clamp(0, 100)
}

pub fn proficiency_label(level: i32) -> Option<&'static str> {
    match level {
        1..=3 => Some("Beginner"),
        4..=6 => Some("Intermediate"),
        7..=8 => Some("Advanced"),
        9..=10 => Some("Expert"),
        _ => None,
    }
}

pub fn icon_name(name: &str) -> String {
    NON_ICON_CHARS.replace_all(&name.to_lowercase(), "_").into_owned()
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillResponse {
    pub id: i64,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub proficiency_percentage: i32,
    pub proficiency_label: Option<String>,
    pub years_of_experience: f64,
    pub description: Option<String>,
    pub featured: bool,
    pub icon_url: Option<String>,
    pub color_code: Option<String>,
    pub icon_name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category_name: String,
    pub skills: Vec<SkillResponse>,
    pub count: usize,
}

impl Skill {
    pub fn to_response(&self) -> SkillResponse {
        SkillResponse {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            proficiency_level: self.proficiency_level,
            proficiency_percentage: proficiency_percentage(self.proficiency_level),
            proficiency_label: proficiency_label(self.proficiency_level).map(str::to_string),
            years_of_experience: self.years_of_experience,
            description: self.description.clone(),
            featured: self.featured,
            icon_url: self.icon_url.clone(),
            color_code: self.color_code.clone(),
            icon_name: icon_name(&self.name),
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct NewSkillRequest {
    #[validate(length(min = 2, max = 50))]
    pub name: String,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[validate(range(min = 1, max = 10))]
    pub proficiency_level: i32,

    #[validate(custom(function = "validate_years"))]
    pub years_of_experience: f64,

    pub description: Option<String>,
    pub featured: bool,
    pub icon_url: Option<String>,
    pub color_code: Option<String>,
    pub sort_order: i32,
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    SkillCategory::from_str(value)
        .map(|_| ())
        .map_err(|_| new_validation_error("inclusion", "is not included in the list"))
}

fn validate_years(value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(new_validation_error("greater_than", "must be greater than 0"))
    }
}

impl NewSkillRequest {
    /// Length rules apply to the name as it will be stored.
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }
}

impl TryFrom<NewSkillRequest> for SkillInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewSkillRequest) -> Result<Self, Self::Error> {
        let value = value.normalized();
        value.validate()?;

        let category = value.category.parse().map_err(|_| {
            let mut errors = ValidationErrors::new();
            errors.add("category", new_validation_error("inclusion", "is not included in the list"));
            errors
        })?;

        Ok(SkillInsert {
            name: value.name,
            category,
            proficiency_level: value.proficiency_level,
            years_of_experience: value.years_of_experience,
            description: value.description.filter(|s| !s.trim().is_empty()),
            featured: value.featured,
            icon_url: value.icon_url.filter(|s| !s.trim().is_empty()),
            color_code: value.color_code.filter(|s| !s.trim().is_empty()),
            sort_order: value.sort_order,
        })
    }
}

impl TryFrom<SkillRow> for Skill {
    type Error = AppError;

    fn try_from(row: SkillRow) -> Result<Self, Self::Error> {
        let category = row.category.parse().map_err(|_| {
            AppError::InternalError(format!("skill {} has unknown category {:?}", row.id, row.category))
        })?;

        Ok(Skill {
            id: row.id,
            name: row.name,
            category,
            proficiency_level: row.proficiency_level,
            years_of_experience: row.years_of_experience,
            description: row.description,
            featured: row.featured,
            icon_url: row.icon_url,
            color_code: row.color_code,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
