use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::list_field::{comma_list, line_list},
    errors::{new_validation_error, AppError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 5] = [
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Freelance,
        Self::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Contract => "contract",
            EmploymentType::Freelance => "freelance",
            EmploymentType::Internship => "internship",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full Time",
            EmploymentType::PartTime => "Part Time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Freelance => "Freelance",
            EmploymentType::Internship => "Internship",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ExperienceRow {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub employment_type: String,
    pub location: String,
    pub company_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
    pub featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub employment_type: EmploymentType,
    pub location: String,
    pub company_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
    pub featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ExperienceInsert {
    pub company_name: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub employment_type: EmploymentType,
    pub location: String,
    pub company_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
    pub featured: bool,
    pub sort_order: i32,
}

impl ExperienceInsert {
    pub fn into_experience(self, id: i64, now: DateTime<Utc>) -> Experience {
        Experience {
            id,
            company_name: self.company_name,
            position: self.position,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            employment_type: self.employment_type,
            location: self.location,
            company_url: self.company_url,
            company_logo_url: self.company_logo_url,
            technologies: self.technologies,
            achievements: self.achievements,
            featured: self.featured,
            sort_order: self.sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

// ───── Derived attributes ───────────────────────────────────────────

impl Experience {
    /// Whole calendar months from start to end (or `today` for current
    /// positions), counting both boundary months.
    pub fn duration_in_months(&self, today: NaiveDate) -> i32 {
        let end = if self.current { Some(today) } else { self.end_date };

        match end {
            Some(end) => {
                (end.year() - self.start_date.year()) * 12
                    + (end.month() as i32 - self.start_date.month() as i32)
                    + 1
            }
            None => 0,
        }
    }
}

pub fn duration_text(months: i32) -> String {
    if months < 1 {
        return "Less than a month".to_string();
    }

    let years = months / 12;
    let remaining = months % 12;

    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(format!("{} {}", years, if years == 1 { "year" } else { "years" }));
    }
    if remaining > 0 {
        parts.push(format!("{} {}", remaining, if remaining == 1 { "month" } else { "months" }));
    }

    parts.join(" ")
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ExperienceResponse {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub employment_type: EmploymentType,
    pub employment_type_label: String,
    pub location: String,
    pub company_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub technologies_list: Vec<String>,
    pub achievements_list: Vec<String>,
    pub featured: bool,
    pub duration_in_months: i32,
    pub duration_text: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Experience {
    pub fn to_response(&self, today: NaiveDate) -> ExperienceResponse {
        let months = self.duration_in_months(today);

        ExperienceResponse {
            id: self.id,
            company_name: self.company_name.clone(),
            position: self.position.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            employment_type: self.employment_type,
            employment_type_label: self.employment_type.label().to_string(),
            location: self.location.clone(),
            company_url: self.company_url.clone(),
            company_logo_url: self.company_logo_url.clone(),
            technologies_list: self.technologies.clone(),
            achievements_list: self.achievements.clone(),
            featured: self.featured,
            duration_in_months: months,
            duration_text: duration_text(months),
            sort_order: self.sort_order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct NewExperienceRequest {
    #[validate(length(min = 2, max = 100))]
    pub company_name: String,

    #[validate(length(min = 2, max = 100))]
    pub position: String,

    #[validate(length(min = 20, max = 2000))]
    pub description: String,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current: bool,

    #[validate(custom(function = "validate_employment_type"))]
    pub employment_type: String,

    #[validate(length(min = 2, max = 100))]
    pub location: String,

    pub company_url: Option<String>,
    pub company_logo_url: Option<String>,

    #[serde(deserialize_with = "comma_list")]
    pub technologies: Vec<String>,

    #[serde(deserialize_with = "line_list")]
    pub achievements: Vec<String>,

    pub featured: bool,
    pub sort_order: i32,
}

fn validate_employment_type(value: &str) -> Result<(), ValidationError> {
    EmploymentType::from_str(value)
        .map(|_| ())
        .map_err(|_| new_validation_error("inclusion", "is not included in the list"))
}

impl NewExperienceRequest {
    /// Surrounding whitespace is dropped, so whitespace-only text counts as blank.
    fn normalized(mut self) -> Self {
        self.company_name = self.company_name.trim().to_string();
        self.position = self.position.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self.employment_type = self.employment_type.trim().to_string();
        self
    }

    /// Field rules plus the date invariants, which depend on `today`.
    pub fn into_insert(self, today: NaiveDate) -> Result<ExperienceInsert, ValidationErrors> {
        let value = self.normalized();
        let mut errors = match value.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        match value.start_date {
            None => errors.add("start_date", new_validation_error("presence", "can't be blank")),
            Some(start) => {
                if start > today {
                    errors.add("start_date", new_validation_error("future_date", "cannot be in the future"));
                }
                if let Some(end) = value.end_date {
                    if end < start {
                        errors.add("end_date", new_validation_error("before_start", "must be after start date"));
                    }
                }
            }
        }

        let employment_type = value.employment_type.parse::<EmploymentType>().ok();

        match (value.start_date, employment_type) {
            (Some(start_date), Some(employment_type)) if errors.is_empty() => Ok(ExperienceInsert {
                company_name: value.company_name,
                position: value.position,
                description: value.description,
                start_date,
                end_date: value.end_date,
                current: value.current,
                employment_type,
                location: value.location,
                company_url: value.company_url.filter(|s| !s.trim().is_empty()),
                company_logo_url: value.company_logo_url.filter(|s| !s.trim().is_empty()),
                technologies: value.technologies,
                achievements: value.achievements,
                featured: value.featured,
                sort_order: value.sort_order,
            }),
            _ => Err(errors),
        }
    }
}

impl TryFrom<ExperienceRow> for Experience {
    type Error = AppError;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        let employment_type = row.employment_type.parse().map_err(|_| {
            AppError::InternalError(format!(
                "experience {} has unknown employment type {:?}",
                row.id, row.employment_type
            ))
        })?;

        Ok(Experience {
            id: row.id,
            company_name: row.company_name,
            position: row.position,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            current: row.current,
            employment_type,
            location: row.location,
            company_url: row.company_url,
            company_logo_url: row.company_logo_url,
            technologies: row.technologies,
            achievements: row.achievements,
            featured: row.featured,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::full_messages;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> NewExperienceRequest {
        NewExperienceRequest {
            company_name: "Acme".into(),
            position: "Engineer".into(),
            description: "Built and operated the billing platform.".into(),
            start_date: Some(date(2020, 6, 1)),
            end_date: Some(date(2022, 2, 28)),
            employment_type: "full_time".into(),
            location: "Remote".into(),
            ..Default::default()
        }
    }

    fn experience(start: NaiveDate, end: Option<NaiveDate>, current: bool) -> Experience {
        NewExperienceRequest { start_date: Some(start), end_date: end, current, ..request() }
            .into_insert(date(2030, 1, 1))
            .unwrap()
            .into_experience(1, Utc::now())
    }

    #[test]
    fn duration_counts_both_boundary_months() {
        let exp = experience(date(2020, 6, 1), Some(date(2022, 2, 28)), false);
        assert_eq!(exp.duration_in_months(date(2030, 1, 1)), 21);
        assert_eq!(duration_text(21), "1 year 9 months");
    }

    #[test]
    fn current_positions_run_until_today_and_ignore_end_date() {
        let exp = experience(date(2022, 3, 1), Some(date(2022, 4, 1)), true);
        assert_eq!(exp.duration_in_months(date(2024, 3, 15)), 25);
    }

    #[test]
    fn missing_end_date_on_past_position_yields_zero() {
        let exp = experience(date(2022, 3, 1), None, false);
        assert_eq!(exp.duration_in_months(date(2024, 3, 15)), 0);
        assert_eq!(duration_text(0), "Less than a month");
    }

    #[test]
    fn duration_text_pluralizes_and_omits_zero_parts() {
        assert_eq!(duration_text(1), "1 month");
        assert_eq!(duration_text(12), "1 year");
        assert_eq!(duration_text(24), "2 years");
        assert_eq!(duration_text(13), "1 year 1 month");
        assert_eq!(duration_text(38), "3 years 2 months");
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let result = NewExperienceRequest {
            start_date: Some(date(2022, 5, 1)),
            end_date: Some(date(2022, 4, 30)),
            ..request()
        }
        .into_insert(date(2024, 1, 1));

        assert_eq!(full_messages(&result.unwrap_err()), vec!["End date must be after start date"]);
    }

    #[test]
    fn start_date_in_future_is_rejected() {
        let today = date(2024, 1, 1);
        let result = NewExperienceRequest {
            start_date: Some(date(2024, 1, 2)),
            end_date: None,
            current: true,
            ..request()
        }
        .into_insert(today);

        assert_eq!(full_messages(&result.unwrap_err()), vec!["Start date cannot be in the future"]);
    }

    #[test]
    fn start_date_equal_to_today_is_accepted() {
        let today = date(2024, 1, 1);
        let result = NewExperienceRequest { start_date: Some(today), end_date: Some(today), ..request() }
            .into_insert(today);
        assert!(result.is_ok());
    }

    #[test]
    fn missing_start_date_and_bad_type_are_reported_together() {
        let result = NewExperienceRequest {
            start_date: None,
            employment_type: "volunteer".into(),
            ..request()
        }
        .into_insert(date(2024, 1, 1));

        let messages = full_messages(&result.unwrap_err());
        assert!(messages.contains(&"Employment type is not included in the list".to_string()));
        assert!(messages.contains(&"Start date can't be blank".to_string()));
    }

    #[test]
    fn response_exposes_labels_and_lists() {
        let exp = experience(date(2021, 1, 1), Some(date(2021, 12, 31)), false);
        let response = exp.to_response(date(2030, 1, 1));
        assert_eq!(response.employment_type_label, "Full Time");
        assert_eq!(response.duration_in_months, 12);
        assert_eq!(response.duration_text, "1 year");
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let result = NewExperienceRequest {
            position: "   ".into(),
            description: " ".repeat(25),
            location: "\t ".into(),
            ..request()
        }
        .into_insert(date(2024, 1, 1));

        assert_eq!(
            full_messages(&result.unwrap_err()),
            vec![
                "Description can't be blank",
                "Location can't be blank",
                "Position can't be blank",
            ]
        );
    }

    #[test]
    fn text_fields_are_trimmed_before_length_checks() {
        let short = NewExperienceRequest { company_name: "  A  ".into(), ..request() }
            .into_insert(date(2024, 1, 1));
        assert_eq!(
            full_messages(&short.unwrap_err()),
            vec!["Company name is too short (minimum is 2 characters)"]
        );

        let padded = NewExperienceRequest { company_name: "  Acme  ".into(), ..request() }
            .into_insert(date(2024, 1, 1))
            .unwrap();
        assert_eq!(padded.company_name, "Acme");
    }
}
