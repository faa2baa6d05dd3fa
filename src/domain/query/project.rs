use std::cmp::Ordering;

use crate::{
    constants::{DEFAULT_PROJECTS_PER_PAGE, MAX_PROJECTS_PER_PAGE},
    entities::project::{Project, ProjectStatus},
};

use super::{contains_ci, flag, pagination::paginate, parsed, text, Page, PageRequest, Params};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    /// featured desc, created_at desc
    #[default]
    Default,
    Title,
    CreatedAt,
}

impl ProjectSort {
    fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("title") => ProjectSort::Title,
            Some("created_at") => ProjectSort::CreatedAt,
            _ => ProjectSort::Default,
        }
    }
}

/// Listing query for published projects.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub featured_only: bool,
    pub search: Option<String>,
    pub sort: ProjectSort,
    pub page: PageRequest,
}

impl ProjectQuery {
    pub fn from_params(params: &Params) -> Self {
        ProjectQuery {
            status: parsed(params, "status"),
            featured_only: flag(params, "featured"),
            search: text(params, "search"),
            sort: ProjectSort::from_param(params.get("sort_by").map(String::as_str)),
            page: PageRequest::from_params(params, DEFAULT_PROJECTS_PER_PAGE, MAX_PROJECTS_PER_PAGE),
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        project.published
            && self.status.is_none_or(|status| project.status == status)
            && (!self.featured_only || project.featured)
            && self.search.as_deref().is_none_or(|term| {
                contains_ci(&project.title, term) || contains_ci(&project.description, term)
            })
    }

    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        let primary = match self.sort {
            ProjectSort::Default => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at)),
            ProjectSort::Title => a.title.cmp(&b.title),
            ProjectSort::CreatedAt => b.created_at.cmp(&a.created_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Filters, orders and paginates an in-memory collection.
    pub fn apply(&self, projects: impl IntoIterator<Item = Project>) -> Page<Project> {
        let mut selected: Vec<Project> = projects.into_iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        paginate(selected, self.page)
    }
}
