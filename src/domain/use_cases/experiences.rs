use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    entities::experience::{Experience, ExperienceResponse, NewExperienceRequest},
    errors::AppError,
    query::{ExperienceQuery, Params},
    repositories::experience::ExperienceRepository,
};

#[derive(Clone)]
pub struct ExperienceHandler {
    pub experience_repo: Arc<dyn ExperienceRepository>,
}

impl ExperienceHandler {
    pub fn new(experience_repo: Arc<dyn ExperienceRepository>) -> Self {
        ExperienceHandler { experience_repo }
    }

    /// Durations of current positions are measured up to `today`.
    pub async fn list_experiences(
        &self,
        params: &Params,
        today: NaiveDate,
    ) -> Result<Vec<ExperienceResponse>, AppError> {
        let query = ExperienceQuery::from_params(params);
        let experiences = self.experience_repo.list_experiences(&query).await?;
        Ok(experiences.iter().map(|e| e.to_response(today)).collect())
    }

    pub async fn create_experience(
        &self,
        request: NewExperienceRequest,
        today: NaiveDate,
    ) -> Result<Experience, AppError> {
        let insert = request.into_insert(today)?;
        self.experience_repo.create_experience(&insert).await
    }
}
