use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, shared_repos::StorageStatus, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    uptime: String,
    start_at: String,
    timestamp: String,
    storage: StorageStatus,
}

/// Liveness probe. Answers 503 when the configured store cannot be reached.
#[get("/up")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let storage = state.repos.storage_status().await;
    let healthy = storage.healthy;

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.env.to_string(),
        uptime: human_uptime.to_string(),
        start_at: START_TIME.to_rfc3339(),
        timestamp: now_utc.to_rfc3339(),
        storage,
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
