use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;

use crate::repositories::{
    contact_message::ContactMessageRepository,
    experience::ExperienceRepository,
    memory::MemoryStore,
    project::ProjectRepository,
    skill::SkillRepository,
    sqlx_repo::{SqlxContactMessageRepo, SqlxExperienceRepo, SqlxProjectRepo, SqlxSkillRepo},
};

#[derive(Clone)]
pub enum StorageBackend {
    Postgres(PgPool),
    Memory,
}

#[derive(Debug, Serialize)]
pub struct StorageStatus {
    pub backend: &'static str,
    pub status: &'static str,
    #[serde(skip)]
    pub healthy: bool,
}

/// One repository per entity, all backed by the same store.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub experience_repo: Arc<dyn ExperienceRepository>,
    pub contact_repo: Arc<dyn ContactMessageRepository>,
    pub backend: StorageBackend,
}

impl SharedRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        SharedRepositories {
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            experience_repo: Arc::new(SqlxExperienceRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactMessageRepo::new(pool.clone())),
            backend: StorageBackend::Postgres(pool),
        }
    }

    pub fn memory() -> Self {
        Self::with_memory_store(Arc::new(MemoryStore::new()))
    }

    /// Shares an existing store, so callers can keep a handle to it.
    pub fn with_memory_store(store: Arc<MemoryStore>) -> Self {
        SharedRepositories {
            project_repo: store.clone(),
            skill_repo: store.clone(),
            experience_repo: store.clone(),
            contact_repo: store,
            backend: StorageBackend::Memory,
        }
    }

    pub async fn storage_status(&self) -> StorageStatus {
        match &self.backend {
            StorageBackend::Postgres(pool) => {
                let reachable = sqlx::query("SELECT 1").execute(pool).await;
                if let Err(e) = &reachable {
                    tracing::warn!("Database health check failed: {}", e);
                }
                StorageStatus {
                    backend: "postgres",
                    status: if reachable.is_ok() { "OK" } else { "Unavailable" },
                    healthy: reachable.is_ok(),
                }
            }
            StorageBackend::Memory => StorageStatus {
                backend: "memory",
                status: "OK",
                healthy: true,
            },
        }
    }
}
