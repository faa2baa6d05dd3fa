use std::cmp::Ordering;

use crate::entities::{
    experience::{EmploymentType, Experience},
    list_field::join_list,
};

use super::{contains_ci, flag, parsed, text, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExperienceSort {
    /// current desc, start_date desc
    #[default]
    Default,
    CompanyName,
    Position,
    StartDate,
    EndDate,
}

impl ExperienceSort {
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("company_name") => ExperienceSort::CompanyName,
            Some("position") => ExperienceSort::Position,
            Some("start_date") => ExperienceSort::StartDate,
            Some("end_date") => ExperienceSort::EndDate,
            _ => ExperienceSort::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExperienceQuery {
    pub employment_type: Option<EmploymentType>,
    /// `Some(true)` for current positions, `Some(false)` for past ones.
    pub current: Option<bool>,
    pub featured_only: bool,
    pub technology: Option<String>,
    pub sort: ExperienceSort,
}

impl ExperienceQuery {
    pub fn from_params(params: &Params) -> Self {
        let current = match params.get("current").map(String::as_str) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        ExperienceQuery {
            employment_type: parsed(params, "employment_type"),
            current,
            featured_only: flag(params, "featured"),
            technology: text(params, "technology"),
            sort: ExperienceSort::from_param(params.get("sort_by").map(String::as_str)),
        }
    }

    pub fn matches(&self, experience: &Experience) -> bool {
        self.employment_type.is_none_or(|t| experience.employment_type == t)
            && self.current.is_none_or(|current| experience.current == current)
            && (!self.featured_only || experience.featured)
            && self
                .technology
                .as_deref()
                .is_none_or(|term| contains_ci(&join_list(&experience.technologies), term))
    }

    pub fn compare(&self, a: &Experience, b: &Experience) -> Ordering {
        let primary = match self.sort {
            ExperienceSort::Default => b
                .current
                .cmp(&a.current)
                .then_with(|| b.start_date.cmp(&a.start_date)),
            ExperienceSort::CompanyName => a.company_name.cmp(&b.company_name),
            ExperienceSort::Position => a.position.cmp(&b.position),
            ExperienceSort::StartDate => b.start_date.cmp(&a.start_date),
            // Descending with missing end dates last.
            ExperienceSort::EndDate => match (a.end_date, b.end_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn apply(&self, experiences: impl IntoIterator<Item = Experience>) -> Vec<Experience> {
        let mut selected: Vec<Experience> = experiences.into_iter().filter(|e| self.matches(e)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::{entities::experience::ExperienceInsert, query::params};

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn experience(id: i64, company: &str, start: NaiveDate, end: Option<NaiveDate>, current: bool) -> Experience {
        ExperienceInsert {
            company_name: company.into(),
            position: "Engineer".into(),
            description: "Worked on distributed systems.".into(),
            start_date: start,
            end_date: end,
            current,
            employment_type: EmploymentType::FullTime,
            location: "Remote".into(),
            company_url: None,
            company_logo_url: None,
            technologies: vec!["Ruby on Rails".into(), "PostgreSQL".into()],
            achievements: vec![],
            featured: false,
            sort_order: 0,
        }
        .into_experience(id, Utc::now())
    }

    fn sample() -> Vec<Experience> {
        vec![
            experience(1, "Initech", date(2018, 1), Some(date(2019, 6)), false),
            experience(2, "Globex", date(2021, 3), None, true),
            experience(3, "Acme", date(2019, 7), Some(date(2021, 2)), false),
            experience(4, "Hooli", date(2017, 1), None, false),
        ]
    }

    fn ids(list: &[Experience]) -> Vec<i64> {
        list.iter().map(|e| e.id).collect()
    }

    #[test]
    fn default_order_is_current_then_newest_start() {
        let result = ExperienceQuery::from_params(&params(&[])).apply(sample());
        assert_eq!(ids(&result), vec![2, 3, 1, 4]);
    }

    #[test]
    fn end_date_sort_places_missing_dates_last() {
        let query = ExperienceQuery::from_params(&params(&[("sort_by", "end_date")]));
        assert_eq!(ids(&query.apply(sample())), vec![3, 1, 2, 4]);
    }

    #[test]
    fn company_name_sort_is_ascending() {
        let query = ExperienceQuery::from_params(&params(&[("sort_by", "company_name")]));
        assert_eq!(ids(&query.apply(sample())), vec![3, 2, 4, 1]);
    }

    #[test]
    fn current_filter_accepts_true_and_false_only() {
        let current = ExperienceQuery::from_params(&params(&[("current", "true")]));
        assert_eq!(ids(&current.apply(sample())), vec![2]);

        let past = ExperienceQuery::from_params(&params(&[("current", "false")]));
        assert_eq!(ids(&past.apply(sample())), vec![3, 1, 4]);

        let ignored = ExperienceQuery::from_params(&params(&[("current", "yes")]));
        assert_eq!(ignored.current, None);
    }

    #[test]
    fn technology_matches_joined_list_text() {
        let mut other = experience(5, "Umbrella", date(2020, 1), None, false);
        other.technologies = vec!["Go".into()];
        let mut list = sample();
        list.push(other);

        let query = ExperienceQuery::from_params(&params(&[("technology", " rails, postgres ")]));
        assert_eq!(query.apply(list.clone()).len(), 4);

        let go = ExperienceQuery::from_params(&params(&[("technology", "go")]));
        assert_eq!(ids(&go.apply(list)), vec![5]);
    }

    #[test]
    fn unknown_employment_type_is_ignored() {
        let query = ExperienceQuery::from_params(&params(&[("employment_type", "volunteer")]));
        assert_eq!(query.employment_type, None);
        assert_eq!(query.apply(sample()).len(), 4);
    }
}
