use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::project::{Project, ProjectInsert, ProjectRow},
    errors::AppError,
    query::{like_pattern, Page, PaginationMeta, ProjectQuery, ProjectSort},
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Sync + Send {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Page<Project>, AppError>;
    /// Atomically bumps `view_count` of a published project and returns the
    /// updated record, or `None` when no published project has that id.
    async fn increment_view_count(&self, id: i64) -> Result<Option<Project>, AppError>;
    async fn count_projects(&self) -> Result<i64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProjectQuery) {
    builder.push(" WHERE published = TRUE");

    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }

    if query.featured_only {
        builder.push(" AND featured = TRUE");
    }

    if let Some(term) = &query.search {
        let pattern = like_pattern(term);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn order_clause(sort: ProjectSort) -> &'static str {
    match sort {
        ProjectSort::Default => " ORDER BY featured DESC, created_at DESC, id ASC",
        ProjectSort::Title => r#" ORDER BY title COLLATE "C" ASC, id ASC"#,
        ProjectSort::CreatedAt => " ORDER BY created_at DESC, id ASC",
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (
                title, description, short_description, github_url, live_url, technologies,
                status, priority, published, featured, completed_at, challenges, learnings,
                future_improvements, featured_image_url, image_urls
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.short_description)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&project.technologies)
        .bind(project.status.as_str())
        .bind(project.priority.as_str())
        .bind(project.published)
        .bind(project.featured)
        .bind(project.completed_at)
        .bind(&project.challenges)
        .bind(&project.learnings)
        .bind(&project.future_improvements)
        .bind(&project.featured_image_url)
        .bind(&project.image_urls)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_projects(&self, query: &ProjectQuery) -> Result<Page<Project>, AppError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM projects");
        push_filters(&mut count, query);
        let total_count: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut builder = QueryBuilder::new("SELECT * FROM projects");
        push_filters(&mut builder, query);
        builder.push(order_clause(query.sort));
        builder.push(" LIMIT ").push_bind(query.page.limit());
        builder.push(" OFFSET ").push_bind(query.page.offset());

        let rows: Vec<ProjectRow> = builder.build_query_as::<ProjectRow>().fetch_all(&self.pool).await?;
        let items = rows.into_iter().map(Project::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(Page { items, meta: PaginationMeta::new(query.page, total_count) })
    }

    async fn increment_view_count(&self, id: i64) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET view_count = view_count + 1
            WHERE id = $1 AND published = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn count_projects(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
