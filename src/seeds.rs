use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    entities::{
        experience::NewExperienceRequest, project::NewProjectRequest, skill::NewSkillRequest,
    },
    errors::AppError,
    AppState,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub skills: usize,
    pub experiences: usize,
    pub projects: usize,
}

fn skills() -> Value {
    json!([
        { "name": "React", "category": "frontend", "proficiency_level": 9, "years_of_experience": 4.5, "featured": true, "color_code": "#61DAFB" },
        { "name": "TypeScript", "category": "frontend", "proficiency_level": 8, "years_of_experience": 3.0, "featured": true, "color_code": "#3178C6" },
        { "name": "JavaScript", "category": "frontend", "proficiency_level": 9, "years_of_experience": 5.0, "featured": true, "color_code": "#F7DF1E" },
        { "name": "HTML5", "category": "frontend", "proficiency_level": 9, "years_of_experience": 6.0, "featured": false, "color_code": "#E34F26" },
        { "name": "CSS3", "category": "frontend", "proficiency_level": 8, "years_of_experience": 6.0, "featured": false, "color_code": "#1572B6" },
        { "name": "Tailwind CSS", "category": "frontend", "proficiency_level": 9, "years_of_experience": 2.0, "featured": true, "color_code": "#06B6D4" },
        { "name": "Next.js", "category": "frontend", "proficiency_level": 8, "years_of_experience": 2.5, "featured": true, "color_code": "#000000" },
        { "name": "Ruby on Rails", "category": "backend", "proficiency_level": 9, "years_of_experience": 4.0, "featured": true, "color_code": "#CC0000" },
        { "name": "Node.js", "category": "backend", "proficiency_level": 7, "years_of_experience": 3.0, "featured": true, "color_code": "#339933" },
        { "name": "Python", "category": "backend", "proficiency_level": 6, "years_of_experience": 2.0, "featured": false, "color_code": "#3776AB" },
        { "name": "Ruby", "category": "languages", "proficiency_level": 9, "years_of_experience": 4.0, "featured": true, "color_code": "#CC342D" },
        { "name": "PostgreSQL", "category": "database", "proficiency_level": 8, "years_of_experience": 3.5, "featured": true, "color_code": "#336791" },
        { "name": "MongoDB", "category": "database", "proficiency_level": 6, "years_of_experience": 2.0, "featured": false, "color_code": "#47A248" },
        { "name": "Redis", "category": "database", "proficiency_level": 7, "years_of_experience": 2.5, "featured": false, "color_code": "#DC382D" },
        { "name": "Git", "category": "tools", "proficiency_level": 9, "years_of_experience": 5.0, "featured": true, "color_code": "#F05032" },
        { "name": "Docker", "category": "devops", "proficiency_level": 7, "years_of_experience": 2.0, "featured": true, "color_code": "#2496ED" },
        { "name": "AWS", "category": "devops", "proficiency_level": 6, "years_of_experience": 1.5, "featured": false, "color_code": "#232F3E" },
        { "name": "Heroku", "category": "devops", "proficiency_level": 8, "years_of_experience": 3.0, "featured": false, "color_code": "#430098" },
        { "name": "Figma", "category": "design", "proficiency_level": 7, "years_of_experience": 2.0, "featured": false, "color_code": "#F24E1E" },
        { "name": "Adobe XD", "category": "design", "proficiency_level": 6, "years_of_experience": 1.5, "featured": false, "color_code": "#FF61F6" }
    ])
}

fn experiences() -> Value {
    json!([
        {
            "company_name": "TechCorp Solutions",
            "position": "Senior Full Stack Developer",
            "description": "Led development of multiple web applications using React and Rails. Collaborated with product team to deliver user-centric features. Mentored junior developers and established coding standards.",
            "start_date": "2022-03-01",
            "current": true,
            "employment_type": "full_time",
            "location": "San Francisco, CA (Remote)",
            "company_url": "https://techcorp.example.com",
            "technologies": "React, TypeScript, Ruby on Rails, PostgreSQL, AWS, Docker",
            "achievements": "Increased application performance by 40%\nLed a team of 4 developers\nImplemented CI/CD pipeline reducing deployment time by 60%",
            "featured": true
        },
        {
            "company_name": "StartupXYZ",
            "position": "Full Stack Developer",
            "description": "Developed and maintained multiple client projects using modern web technologies. Worked directly with clients for requirements gathering and project delivery.",
            "start_date": "2020-06-01",
            "end_date": "2022-02-28",
            "employment_type": "full_time",
            "location": "Austin, TX",
            "company_url": "https://startupxyz.example.com",
            "technologies": "React, Node.js, MongoDB, Express.js, GraphQL",
            "achievements": "Delivered 15+ client projects on time\nReduced bug reports by 30% through improved testing\nBuilt reusable component library",
            "featured": true
        },
        {
            "company_name": "Freelance",
            "position": "Web Developer",
            "description": "Provided web development services to small businesses and startups. Specialized in creating responsive, modern websites and web applications.",
            "start_date": "2019-01-01",
            "end_date": "2020-05-31",
            "employment_type": "freelance",
            "location": "Remote",
            "technologies": "HTML, CSS, JavaScript, WordPress, PHP, MySQL",
            "achievements": "Completed 25+ freelance projects\nMaintained 98% client satisfaction rate\nGenerated $50k+ in revenue",
            "featured": false
        }
    ])
}

fn projects() -> Value {
    json!([
        {
            "title": "E-Commerce Platform",
            "short_description": "Full-featured e-commerce platform with payment integration and admin dashboard.",
            "description": "A comprehensive e-commerce solution built with React and Rails API. Features include user authentication, product catalog, shopping cart, payment integration with Stripe, order management, and an admin dashboard for inventory management.",
            "github_url": "https://github.com/username/ecommerce-platform",
            "live_url": "https://ecommerce-demo.example.com",
            "technologies": "React, TypeScript, Ruby on Rails, PostgreSQL, Stripe API, Tailwind CSS",
            "status": "completed",
            "priority": "high",
            "published": true,
            "featured": true,
            "completed_at": "2023-08-15",
            "challenges": "Implementing secure payment processing and handling complex state management for the shopping cart.",
            "learnings": "Gained deep understanding of payment processing security and advanced React patterns.",
            "future_improvements": "Add wishlist functionality, advanced search filters, and mobile app version."
        },
        {
            "title": "Task Management App",
            "short_description": "Collaborative task management application with real-time updates and team features.",
            "description": "A modern task management application that allows teams to collaborate effectively. Built with Next.js and Rails API, featuring real-time updates, drag-and-drop task organization, team management, and detailed analytics.",
            "github_url": "https://github.com/username/task-manager",
            "live_url": "https://taskmanager-demo.example.com",
            "technologies": "Next.js, React, Ruby on Rails, WebSockets, PostgreSQL, Tailwind CSS",
            "status": "completed",
            "priority": "high",
            "published": true,
            "featured": true,
            "completed_at": "2023-06-30",
            "challenges": "Implementing real-time synchronization across multiple users and handling offline functionality.",
            "learnings": "Learned advanced WebSocket implementation and state synchronization techniques.",
            "future_improvements": "Add mobile app, advanced reporting, and integration with popular calendar applications."
        },
        {
            "title": "Weather Dashboard",
            "short_description": "Beautiful weather dashboard with location-based forecasts and interactive maps.",
            "description": "An elegant weather application that provides detailed weather information with beautiful visualizations. Features location-based weather, 7-day forecasts, interactive weather maps, and personalized weather alerts.",
            "github_url": "https://github.com/username/weather-dashboard",
            "live_url": "https://weather-dash.example.com",
            "technologies": "React, OpenWeather API, Mapbox, Chart.js, Tailwind CSS",
            "status": "completed",
            "priority": "medium",
            "published": true,
            "featured": false,
            "completed_at": "2023-04-20",
            "challenges": "Handling API rate limits and creating smooth animations for weather data transitions.",
            "learnings": "Improved skills in data visualization and API optimization.",
            "future_improvements": "Add weather history analysis and social sharing features."
        },
        {
            "title": "Social Media Analytics Tool",
            "short_description": "Analytics dashboard for social media performance tracking and insights.",
            "description": "A comprehensive analytics tool for social media managers to track performance across multiple platforms. Features automated data collection, customizable dashboards, performance insights, and automated reporting.",
            "github_url": "https://github.com/username/social-analytics",
            "live_url": "https://social-analytics.example.com",
            "technologies": "React, Node.js, MongoDB, Social Media APIs, D3.js, Material-UI",
            "status": "in_progress",
            "priority": "high",
            "published": true,
            "featured": true,
            "challenges": "Integrating multiple social media APIs and handling large datasets efficiently.",
            "learnings": "Advanced data processing techniques and complex dashboard design patterns.",
            "future_improvements": "Add AI-powered insights and competitor analysis features."
        },
        {
            "title": "Personal Finance Tracker",
            "short_description": "Secure personal finance management app with budgeting and expense tracking.",
            "description": "A secure and user-friendly personal finance application that helps users manage their money effectively. Features include expense tracking, budget planning, financial goal setting, and detailed financial reports.",
            "github_url": "https://github.com/username/finance-tracker",
            "technologies": "Vue.js, Ruby on Rails, PostgreSQL, Chart.js, Plaid API",
            "status": "planned",
            "priority": "medium",
            "published": false,
            "featured": false,
            "challenges": "Ensuring data security and privacy while providing comprehensive financial insights.",
            "learnings": "Planning to learn advanced security practices and financial data handling.",
            "future_improvements": "Integration with investment tracking and tax preparation features."
        }
    ])
}

/// Each entry gets its position in the list as `sort_order`.
fn requests<T: DeserializeOwned>(data: Value, with_sort_order: bool) -> Result<Vec<T>, AppError> {
    let Value::Array(entries) = data else {
        return Err(AppError::InternalError("seed data must be a list".into()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, mut entry)| {
            if with_sort_order {
                entry["sort_order"] = json!(index);
            }
            serde_json::from_value(entry)
                .map_err(|e| AppError::InternalError(format!("invalid seed entry: {}", e)))
        })
        .collect()
}

/// Loads the sample portfolio unless the store already holds content.
pub async fn seed_sample_data(state: &AppState) -> Result<SeedSummary, AppError> {
    let repos = &state.repos;
    let existing = repos.project_repo.count_projects().await?
        + repos.skill_repo.count_skills().await?
        + repos.experience_repo.count_experiences().await?;

    if existing > 0 {
        tracing::info!("🌱 Store already holds {} records; skipping sample data", existing);
        return Ok(SeedSummary::default());
    }

    let today = Utc::now().date_naive();
    let mut summary = SeedSummary::default();

    for request in requests::<NewSkillRequest>(skills(), true)? {
        let skill = state.skill_handler.create_skill(request).await?;
        tracing::debug!("Seeded skill: {}", skill.name);
        summary.skills += 1;
    }

    for request in requests::<NewExperienceRequest>(experiences(), true)? {
        let experience = state.experience_handler.create_experience(request, today).await?;
        tracing::debug!("Seeded experience: {} at {}", experience.position, experience.company_name);
        summary.experiences += 1;
    }

    for request in requests::<NewProjectRequest>(projects(), false)? {
        let project = state.project_handler.create_project(request).await?;
        tracing::debug!("Seeded project: {}", project.title);
        summary.projects += 1;
    }

    tracing::info!(
        "🌱 Seeded {} skills, {} experiences and {} projects",
        summary.skills,
        summary.experiences,
        summary.projects
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        background_task::NotificationOutbox, settings::AppConfig, shared_repos::SharedRepositories,
    };

    fn state() -> AppState {
        let (outbox, _receiver) = NotificationOutbox::new();
        AppState::new(Arc::new(AppConfig::for_testing()), SharedRepositories::memory(), outbox)
    }

    #[tokio::test]
    async fn seeds_an_empty_store_once() {
        let state = state();

        let first = seed_sample_data(&state).await.unwrap();
        assert_eq!(
            first,
            SeedSummary { skills: 20, experiences: 3, projects: 5 }
        );

        let second = seed_sample_data(&state).await.unwrap();
        assert_eq!(second, SeedSummary::default());
        assert_eq!(state.repos.skill_repo.count_skills().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn unpublished_sample_projects_stay_hidden() {
        let state = state();
        seed_sample_data(&state).await.unwrap();

        let page = state
            .project_handler
            .list_projects(&Default::default())
            .await
            .unwrap();
        assert_eq!(page.meta.total_count, 4);
    }
}
