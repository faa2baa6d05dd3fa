use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::experience::{Experience, ExperienceInsert, ExperienceRow},
    errors::AppError,
    query::{like_pattern, ExperienceQuery, ExperienceSort},
    repositories::sqlx_repo::SqlxExperienceRepo,
};

#[async_trait]
pub trait ExperienceRepository: Sync + Send {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError>;
    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<Experience>, AppError>;
    async fn count_experiences(&self) -> Result<i64, AppError>;
}

impl SqlxExperienceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ExperienceQuery) {
    builder.push(" WHERE TRUE");

    if let Some(employment_type) = query.employment_type {
        builder.push(" AND employment_type = ").push_bind(employment_type.as_str());
    }

    if let Some(current) = query.current {
        builder.push(" AND current = ").push_bind(current);
    }

    if query.featured_only {
        builder.push(" AND featured = TRUE");
    }

    // Matches against the list rendered the same way it was entered.
    if let Some(term) = &query.technology {
        builder
            .push(" AND array_to_string(technologies, ', ') ILIKE ")
            .push_bind(like_pattern(term));
    }
}

fn order_clause(sort: ExperienceSort) -> &'static str {
    match sort {
        ExperienceSort::Default => " ORDER BY current DESC, start_date DESC, id ASC",
        ExperienceSort::CompanyName => r#" ORDER BY company_name COLLATE "C" ASC, id ASC"#,
        ExperienceSort::Position => r#" ORDER BY position COLLATE "C" ASC, id ASC"#,
        ExperienceSort::StartDate => " ORDER BY start_date DESC, id ASC",
        ExperienceSort::EndDate => " ORDER BY end_date DESC NULLS LAST, id ASC",
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn create_experience(&self, experience: &ExperienceInsert) -> Result<Experience, AppError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            r#"
            INSERT INTO experiences (
                company_name, position, description, start_date, end_date, current,
                employment_type, location, company_url, company_logo_url, technologies,
                achievements, featured, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&experience.company_name)
        .bind(&experience.position)
        .bind(&experience.description)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.current)
        .bind(experience.employment_type.as_str())
        .bind(&experience.location)
        .bind(&experience.company_url)
        .bind(&experience.company_logo_url)
        .bind(&experience.technologies)
        .bind(&experience.achievements)
        .bind(experience.featured)
        .bind(experience.sort_order)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_experiences(&self, query: &ExperienceQuery) -> Result<Vec<Experience>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM experiences");
        push_filters(&mut builder, query);
        builder.push(order_clause(query.sort));

        let rows: Vec<ExperienceRow> = builder.build_query_as::<ExperienceRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Experience::try_from).collect()
    }

    async fn count_experiences(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM experiences")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
