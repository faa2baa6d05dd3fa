use std::{net::TcpListener, sync::Arc};

use actix_web::{dev::Server, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;
pub mod telemetry;
pub mod seeds;

pub use domain::{entities, query, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, mailer, utils};

use background_task::{spawn_notification_worker, NotificationOutbox, NotificationWorker, RetryPolicy};
use mailer::{mailer_from_config, Mailer};
use middlewares::cors::build_cors;
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{
    contact::ContactHandler, experiences::ExperienceHandler, projects::ProjectHandler, skills::SkillHandler,
};

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: SharedRepositories,
    pub project_handler: ProjectHandler,
    pub skill_handler: SkillHandler,
    pub experience_handler: ExperienceHandler,
    pub contact_handler: ContactHandler,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, repos: SharedRepositories, outbox: NotificationOutbox) -> Self {
        AppState {
            project_handler: ProjectHandler::new(repos.project_repo.clone()),
            skill_handler: SkillHandler::new(repos.skill_repo.clone()),
            experience_handler: ExperienceHandler::new(repos.experience_repo.clone()),
            contact_handler: ContactHandler::new(repos.contact_repo.clone(), outbox, config.clone()),
            config,
            repos,
        }
    }
}

/// Wires repositories, the notification outbox and its delivery worker.
pub fn assemble(
    config: AppConfig,
    repos: SharedRepositories,
    mailer: Arc<dyn Mailer>,
) -> (web::Data<AppState>, NotificationWorker) {
    let (outbox, receiver) = NotificationOutbox::new();
    let worker = spawn_notification_worker(
        receiver,
        mailer,
        RetryPolicy::from_config(&config),
        config.shutdown_grace(),
    );

    let state = AppState::new(Arc::new(config), repos, outbox);
    (web::Data::new(state), worker)
}

/// Builds the application state from configuration: PostgreSQL when a
/// database URL is set, the in-memory store otherwise.
pub async fn build_state(config: AppConfig) -> anyhow::Result<(web::Data<AppState>, NotificationWorker)> {
    let repos = if config.uses_database() {
        let pool = db::postgres::create_pool(&config).await?;
        if config.run_migrations {
            db::postgres::run_migrations(&pool).await?;
        }
        SharedRepositories::postgres(pool)
    } else {
        tracing::warn!("No database configured; using the in-memory store");
        SharedRepositories::memory()
    };

    let mailer: Arc<dyn Mailer> = Arc::from(mailer_from_config(&config)?);
    let seed = config.seed_sample_data;
    let (state, worker) = assemble(config, repos, mailer);

    if seed {
        seeds::seed_sample_data(&state).await?;
    }

    Ok((state, worker))
}

pub fn run_server(listener: TcpListener, state: web::Data<AppState>) -> std::io::Result<Server> {
    let config = web::Data::from(state.config.clone());
    let workers = state.config.worker_count.max(1);
    let grace = state.config.shutdown_grace_secs;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .wrap(build_cors(&config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .shutdown_timeout(grace)
    .disable_signals()
    .listen(listener)?
    .run();

    Ok(server)
}
