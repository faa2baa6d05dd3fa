use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::{
    entities::{
        contact_message::{ContactMessage, ContactMessageInsert},
        experience::{Experience, ExperienceInsert},
        project::{Project, ProjectInsert},
        skill::{Skill, SkillInsert},
    },
    errors::AppError,
    query::{ExperienceQuery, Page, ProjectQuery, SkillQuery},
    repositories::{
        contact_message::ContactMessageRepository, experience::ExperienceRepository,
        project::ProjectRepository, skill::SkillRepository,
    },
};

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    projects: Vec<Project>,
    skills: Vec<Skill>,
    experiences: Vec<Experience>,
    contact_messages: Vec<ContactMessage>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store used when no database is configured. All mutations
/// happen under the write lock, so read-modify-write operations are atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_message(
        &self,
        id: i64,
        apply: impl FnOnce(&mut ContactMessage),
    ) -> Option<ContactMessage> {
        let mut state = self.state.write();
        let message = state.contact_messages.iter_mut().find(|m| m.id == id)?;
        apply(message);
        message.updated_at = Utc::now();
        Some(message.clone())
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let mut state = self.state.write();
        let id = state.next_id();
        let project = project.clone().into_project(id, Utc::now());
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self, query: &ProjectQuery) -> Result<Page<Project>, AppError> {
        let projects = self.state.read().projects.clone();
        Ok(query.apply(projects))
    }

    async fn increment_view_count(&self, id: i64) -> Result<Option<Project>, AppError> {
        let mut state = self.state.write();
        let project = state.projects.iter_mut().find(|p| p.id == id && p.published);

        Ok(project.map(|p| {
            p.view_count += 1;
            p.clone()
        }))
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        Ok(self.state.read().projects.len() as i64)
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let mut state = self.state.write();

        let lowered = skill.name.to_lowercase();
        if state.skills.iter().any(|s| s.name.to_lowercase() == lowered) {
            return Err(AppError::validation("Name has already been taken"));
        }

        let id = state.next_id();
        let skill = skill.clone().into_skill(id, Utc::now());
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn list_skills(&self, query: &SkillQuery) -> Result<Vec<Skill>, AppError> {
        let skills = self.state.read().skills.clone();
        Ok(query.apply(skills))
    }

    async fn skill_name_taken(&self, name: &str) -> Result<bool, AppError> {
        let lowered = name.to_lowercase();
        Ok(self.state.read().skills.iter().any(|s| s.name.to_lowercase() == lowered))
    }

    async fn count_skills(&self) -> Result<i64, AppError> {
        Ok(self.state.read().skills.len() as i64)
    }
}

#[async_trait]
impl ExperienceRepository for MemoryStore {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        let mut state = self.state.write();
        let id = state.next_id();
        let experience = experience.clone().into_experience(id, Utc::now());
        state.experiences.push(experience.clone());
        Ok(experience)
    }

    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<Experience>, AppError> {
        let experiences = self.state.read().experiences.clone();
        Ok(query.apply(experiences))
    }

    async fn count_experiences(&self) -> Result<i64, AppError> {
        Ok(self.state.read().experiences.len() as i64)
    }
}

#[async_trait]
impl ContactMessageRepository for MemoryStore {
    async fn create_contact_message(&self, message: &ContactMessageInsert) -> Result<ContactMessage, AppError> {
        let mut state = self.state.write();
        let id = state.next_id();
        let message = message.clone().into_contact_message(id, Utc::now());
        state.contact_messages.push(message.clone());
        Ok(message)
    }

    async fn get_contact_message(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.state.read().contact_messages.iter().find(|m| m.id == id).cloned())
    }

    async fn mark_as_read(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.update_message(id, |m| {
            m.read = true;
            m.read_at = Some(Utc::now());
        }))
    }

    async fn mark_as_replied(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.update_message(id, |m| {
            m.replied = true;
            m.replied_at = Some(Utc::now());
        }))
    }

    async fn mark_as_unread(&self, id: i64) -> Result<Option<ContactMessage>, AppError> {
        Ok(self.update_message(id, |m| {
            m.read = false;
            m.read_at = None;
        }))
    }

    async fn unread_count(&self) -> Result<i64, AppError> {
        Ok(self.state.read().contact_messages.iter().filter(|m| !m.read).count() as i64)
    }

    async fn priority_count(&self) -> Result<i64, AppError> {
        let state = self.state.read();
        Ok(state.contact_messages.iter().filter(|m| !m.read && m.priority).count() as i64)
    }
}
