use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::skill::{Skill, SkillInsert, SkillRow},
    errors::AppError,
    query::SkillQuery,
    repositories::sqlx_repo::SqlxSkillRepo,
};

#[async_trait]
pub trait SkillRepository: Sync + Send {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    async fn list_skills(&self, query: &SkillQuery) -> Result<Vec<Skill>, AppError>;
    /// Case-insensitive name lookup.
    async fn skill_name_taken(&self, name: &str) -> Result<bool, AppError>;
    async fn count_skills(&self) -> Result<i64, AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SkillQuery) {
    builder.push(" WHERE TRUE");

    if let Some(category) = query.category {
        builder.push(" AND category = ").push_bind(category.as_str());
    }

    if query.featured_only {
        builder.push(" AND featured = TRUE");
    }

    if let Some(min) = query.min_proficiency {
        builder.push(" AND proficiency_level >= ").push_bind(min);
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let row = sqlx::query_as::<_, SkillRow>(
            r#"
            INSERT INTO skills (
                name, category, proficiency_level, years_of_experience, description,
                featured, icon_url, color_code, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&skill.name)
        .bind(skill.category.as_str())
        .bind(skill.proficiency_level)
        .bind(skill.years_of_experience)
        .bind(&skill.description)
        .bind(skill.featured)
        .bind(&skill.icon_url)
        .bind(&skill.color_code)
        .bind(skill.sort_order)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_skills(&self, query: &SkillQuery) -> Result<Vec<Skill>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM skills");
        push_filters(&mut builder, query);
        builder.push(" ORDER BY proficiency_level DESC, sort_order ASC, id ASC");

        let rows: Vec<SkillRow> = builder.build_query_as::<SkillRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Skill::try_from).collect()
    }

    async fn skill_name_taken(&self, name: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM skills WHERE LOWER(name) = LOWER($1))",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn count_skills(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM skills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
