use std::sync::Arc;

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectDetailResponse, ProjectInsert, ProjectListResponse},
    errors::AppError,
    query::{Page, Params, ProjectQuery},
    repositories::project::ProjectRepository,
};

#[derive(Clone)]
pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Published projects matching the query parameters, one page at a time.
    pub async fn list_projects(&self, params: &Params) -> Result<Page<ProjectListResponse>, AppError> {
        let query = ProjectQuery::from_params(params);
        let page = self.project_repo.list_projects(&query).await?;
        Ok(page.map(|project| project.to_list_response()))
    }

    /// Detailed view of a published project. Each successful fetch counts as
    /// one view.
    pub async fn get_project(&self, raw_id: &str) -> Result<ProjectDetailResponse, AppError> {
        let id: i64 = raw_id.parse().map_err(|_| AppError::not_found("Project"))?;

        self.project_repo
            .increment_view_count(id)
            .await?
            .map(|project| project.to_detail_response())
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(request)?;
        self.project_repo.create_project(&insert).await
    }
}
