use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use crate::{
    entities::skill::{NewSkillRequest, Skill, SkillCategory, SkillGroup, SkillInsert, SkillResponse},
    errors::{full_messages, AppError},
    query::{skill::group_by_category, Params, SkillQuery},
    repositories::skill::SkillRepository,
};

const NAME_TAKEN: &str = "Name has already been taken";

/// Either a flat list or a map keyed by category, depending on `grouped`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SkillListing {
    Flat(Vec<SkillResponse>),
    Grouped(BTreeMap<SkillCategory, SkillGroup>),
}

#[derive(Clone)]
pub struct SkillHandler {
    pub skill_repo: Arc<dyn SkillRepository>,
}

impl SkillHandler {
    pub fn new(skill_repo: Arc<dyn SkillRepository>) -> Self {
        SkillHandler { skill_repo }
    }

    pub async fn list_skills(&self, params: &Params) -> Result<SkillListing, AppError> {
        let query = SkillQuery::from_params(params);
        let skills = self.skill_repo.list_skills(&query).await?;

        if query.grouped {
            Ok(SkillListing::Grouped(group_by_category(&skills)))
        } else {
            Ok(SkillListing::Flat(skills.iter().map(Skill::to_response).collect()))
        }
    }

    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<Skill, AppError> {
        let taken = self.skill_repo.skill_name_taken(request.name.trim()).await?;

        match (SkillInsert::try_from(request), taken) {
            (Ok(insert), false) => self.skill_repo.create_skill(&insert).await,
            (Ok(_), true) => Err(AppError::validation(NAME_TAKEN)),
            (Err(errors), taken) => {
                let mut messages = full_messages(&errors);
                if taken {
                    messages.push(NAME_TAKEN.to_string());
                    messages.sort();
                }
                Err(AppError::ValidationError(messages))
            }
        }
    }
}
