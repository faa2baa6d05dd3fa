//! Runs the PostgreSQL repositories against a live database.
//!
//! Each test skips unless `DATABASE_URL` is set, and each test works in a
//! throwaway schema that is dropped afterwards.


use std::collections::HashMap;

use portfolio_api::{
    entities::{
        contact_message::{ClientInfo, NewContactMessageRequest},
        experience::NewExperienceRequest,
        project::{NewProjectRequest, ProjectInsert},
        skill::{NewSkillRequest, SkillInsert},
    },
    errors::AppError,
    query::{ExperienceQuery, ProjectQuery, SkillQuery},
    shared_repos::SharedRepositories,
    use_cases::{projects::ProjectHandler, skills::SkillHandler},
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use test_utils::{contact_body, experience_body, merge, project_body, skill_body};

struct TestDatabase {
    admin: PgPool,
    pool: PgPool,
    schema: String,
}

impl TestDatabase {
    async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL is not set; skipping PostgreSQL repository test");
            return None;
        };

        let schema = format!("test_{}", uuid::Uuid::new_v4().simple());
        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("Failed to connect to DATABASE_URL");
        admin
            .execute(format!(r#"CREATE SCHEMA "{}""#, schema).as_str())
            .await
            .expect("Failed to create test schema");

        let search_path = format!(r#"SET search_path TO "{}""#, schema);
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect test pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(TestDatabase { admin, pool, schema })
    }

    fn repos(&self) -> SharedRepositories {
        SharedRepositories::postgres(self.pool.clone())
    }

    async fn teardown(self) {
        self.pool.close().await;
        self.admin
            .execute(format!(r#"DROP SCHEMA "{}" CASCADE"#, self.schema).as_str())
            .await
            .expect("Failed to drop test schema");
    }
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn project(overrides: Value) -> ProjectInsert {
    let request: NewProjectRequest = serde_json::from_value(merge(project_body(), overrides)).unwrap();
    ProjectInsert::try_from(request).unwrap()
}

fn skill(overrides: Value) -> SkillInsert {
    let request: NewSkillRequest = serde_json::from_value(merge(skill_body(), overrides)).unwrap();
    SkillInsert::try_from(request).unwrap()
}

async fn create_experience(repos: &SharedRepositories, overrides: Value) -> i64 {
    let request: NewExperienceRequest = serde_json::from_value(merge(experience_body(), overrides)).unwrap();
    let insert = request.into_insert(chrono::Utc::now().date_naive()).unwrap();
    repos.experience_repo.create_experience(&insert).await.unwrap().id
}

#[actix_rt::test]
async fn project_listing_filters_orders_and_paginates() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();

    for (title, featured, published, status) in [
        ("alpha tool", true, true, "completed"),
        ("Beta service", true, true, "in_progress"),
        ("Zeta engine", false, true, "completed"),
        ("Hidden draft", true, false, "completed"),
    ] {
        repos
            .project_repo
            .create_project(&project(json!({
                "title": title,
                "featured": featured,
                "published": published,
                "status": status
            })))
            .await
            .unwrap();
    }

    let by_title = repos
        .project_repo
        .list_projects(&ProjectQuery::from_params(&params(&[("sort_by", "title")])))
        .await
        .unwrap();
    let titles: Vec<_> = by_title.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Beta service", "Zeta engine", "alpha tool"]);
    assert_eq!(by_title.meta.total_count, 3);

    let featured = repos
        .project_repo
        .list_projects(&ProjectQuery::from_params(&params(&[("featured", "true"), ("status", "completed")])))
        .await
        .unwrap();
    let titles: Vec<_> = featured.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["alpha tool"]);

    let second_page = repos
        .project_repo
        .list_projects(&ProjectQuery::from_params(&params(&[
            ("sort_by", "title"),
            ("per_page", "2"),
            ("page", "2"),
        ])))
        .await
        .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.items[0].title, "alpha tool");
    assert_eq!(second_page.meta.total_count, 3);
    assert_eq!(second_page.meta.total_pages, 2);
    assert!(!second_page.meta.has_next_page);
    assert!(second_page.meta.has_prev_page);

    db.teardown().await;
}

#[actix_rt::test]
async fn project_search_matches_pattern_characters_literally() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();

    for title in ["Uptime 100% guaranteed", "Uptime 1000 nines", "snake_case tool", "snakeXcase tool"] {
        repos.project_repo.create_project(&project(json!({ "title": title }))).await.unwrap();
    }

    let search = |term: &str| ProjectQuery::from_params(&params(&[("search", term), ("sort_by", "title")]));

    let percent = repos.project_repo.list_projects(&search("100%")).await.unwrap();
    let titles: Vec<_> = percent.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Uptime 100% guaranteed"]);

    let underscore = repos.project_repo.list_projects(&search("SNAKE_case")).await.unwrap();
    let titles: Vec<_> = underscore.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["snake_case tool"]);
    assert_eq!(underscore.meta.total_count, 1);

    db.teardown().await;
}

#[actix_rt::test]
async fn concurrent_views_are_all_counted() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();
    let handler = ProjectHandler::new(repos.project_repo.clone());

    let id = repos.project_repo.create_project(&project(json!({}))).await.unwrap().id;
    let hidden = repos
        .project_repo
        .create_project(&project(json!({ "published": false })))
        .await
        .unwrap()
        .id;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let repo = repos.project_repo.clone();
            tokio::spawn(async move { repo.increment_view_count(id).await })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().unwrap().is_some());
    }

    let detail = handler.get_project(&id.to_string()).await.unwrap();
    assert_eq!(detail.summary.view_count, 21);

    assert!(matches!(
        handler.get_project(&hidden.to_string()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(repos.project_repo.increment_view_count(hidden).await.unwrap().is_none());

    db.teardown().await;
}

#[actix_rt::test]
async fn skill_filters_and_case_insensitive_uniqueness() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();

    for (name, category, level, featured, sort_order) in [
        ("Rust", "languages", 8, true, 2),
        ("Go", "languages", 8, false, 1),
        ("React", "frontend", 9, true, 0),
        ("Figma", "design", 3, false, 0),
    ] {
        repos
            .skill_repo
            .create_skill(&skill(json!({
                "name": name,
                "category": category,
                "proficiency_level": level,
                "featured": featured,
                "sort_order": sort_order
            })))
            .await
            .unwrap();
    }

    let all = repos.skill_repo.list_skills(&SkillQuery::default()).await.unwrap();
    let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["React", "Go", "Rust", "Figma"]);

    let languages = repos
        .skill_repo
        .list_skills(&SkillQuery::from_params(&params(&[("category", "languages"), ("featured", "true")])))
        .await
        .unwrap();
    let names: Vec<_> = languages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Rust"]);

    let proficient = repos
        .skill_repo
        .list_skills(&SkillQuery::from_params(&params(&[("min_proficiency", "8")])))
        .await
        .unwrap();
    assert_eq!(proficient.len(), 3);

    assert!(repos.skill_repo.skill_name_taken("rUsT").await.unwrap());

    let duplicate = repos.skill_repo.create_skill(&skill(json!({ "name": "RUST" }))).await;
    match duplicate {
        Err(AppError::ValidationError(messages)) => {
            assert_eq!(messages, vec!["Name has already been taken"]);
        }
        other => panic!("expected a validation error, got {:?}", other.map(|s| s.name)),
    }

    let handler = SkillHandler::new(repos.skill_repo.clone());
    let request: NewSkillRequest = serde_json::from_value(merge(skill_body(), json!({ "name": "  go " }))).unwrap();
    match handler.create_skill(request).await {
        Err(AppError::ValidationError(messages)) => {
            assert_eq!(messages, vec!["Name has already been taken"]);
        }
        other => panic!("expected a validation error, got {:?}", other.map(|s| s.name)),
    }
    assert_eq!(repos.skill_repo.count_skills().await.unwrap(), 4);

    db.teardown().await;
}

#[actix_rt::test]
async fn experience_ordering_and_technology_filter() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();

    create_experience(
        &repos,
        json!({ "company_name": "acme labs", "end_date": "2019-12-31", "start_date": "2018-01-01", "technologies": "C_, Go" }),
    )
    .await;
    create_experience(
        &repos,
        json!({ "company_name": "Zenith", "end_date": null, "current": true, "start_date": "2023-01-01", "technologies": "Rust, Kafka" }),
    )
    .await;
    create_experience(
        &repos,
        json!({ "company_name": "Bolt", "end_date": "2022-06-30", "start_date": "2020-01-01", "technologies": "CX, Kafka", "employment_type": "contract" }),
    )
    .await;

    let by_end_date = repos
        .experience_repo
        .list_experiences(&ExperienceQuery::from_params(&params(&[("sort_by", "end_date")])))
        .await
        .unwrap();
    let companies: Vec<_> = by_end_date.iter().map(|e| e.company_name.as_str()).collect();
    assert_eq!(companies, vec!["Bolt", "acme labs", "Zenith"]);

    let by_company = repos
        .experience_repo
        .list_experiences(&ExperienceQuery::from_params(&params(&[("sort_by", "company_name")])))
        .await
        .unwrap();
    let companies: Vec<_> = by_company.iter().map(|e| e.company_name.as_str()).collect();
    assert_eq!(companies, vec!["Bolt", "Zenith", "acme labs"]);

    let kafka = repos
        .experience_repo
        .list_experiences(&ExperienceQuery::from_params(&params(&[("technology", "kafka"), ("current", "false")])))
        .await
        .unwrap();
    let companies: Vec<_> = kafka.iter().map(|e| e.company_name.as_str()).collect();
    assert_eq!(companies, vec!["Bolt"]);

    let literal = repos
        .experience_repo
        .list_experiences(&ExperienceQuery::from_params(&params(&[("technology", "c_")])))
        .await
        .unwrap();
    let companies: Vec<_> = literal.iter().map(|e| e.company_name.as_str()).collect();
    assert_eq!(companies, vec!["acme labs"]);

    let contracts = repos
        .experience_repo
        .list_experiences(&ExperienceQuery::from_params(&params(&[("employment_type", "contract")])))
        .await
        .unwrap();
    assert_eq!(contracts.len(), 1);

    db.teardown().await;
}

#[actix_rt::test]
async fn contact_message_read_and_reply_state() {
    let Some(db) = TestDatabase::connect().await else { return };
    let repos = db.repos();

    let request: NewContactMessageRequest = serde_json::from_value(contact_body()).unwrap();
    let insert = request
        .into_insert(ClientInfo { ip_address: Some("203.0.113.7".into()), user_agent: None })
        .unwrap();
    let created = repos.contact_repo.create_contact_message(&insert).await.unwrap();
    assert!(created.priority);
    assert_eq!(created.ip_address.as_deref(), Some("203.0.113.7"));
    assert_eq!(repos.contact_repo.unread_count().await.unwrap(), 1);
    assert_eq!(repos.contact_repo.priority_count().await.unwrap(), 1);

    let read = repos.contact_repo.mark_as_read(created.id).await.unwrap().unwrap();
    assert!(read.read);
    assert!(read.read_at.is_some());
    assert_eq!(repos.contact_repo.unread_count().await.unwrap(), 0);
    assert_eq!(repos.contact_repo.priority_count().await.unwrap(), 0);

    let replied = repos.contact_repo.mark_as_replied(created.id).await.unwrap().unwrap();
    assert!(replied.replied);
    assert!(replied.replied_at.is_some());

    let unread = repos.contact_repo.mark_as_unread(created.id).await.unwrap().unwrap();
    assert!(!unread.read);
    assert!(unread.read_at.is_none());
    assert!(unread.replied);
    assert_eq!(repos.contact_repo.unread_count().await.unwrap(), 1);

    assert!(repos.contact_repo.mark_as_read(created.id + 1000).await.unwrap().is_none());

    db.teardown().await;
}
