use actix_cors::Cors;
use actix_web::http::{header, Method};

use crate::settings::AppConfig;

pub const CORS_MAX_AGE_SECS: usize = 1_728_000;

/// Any origin outside production, the configured allow-list in production.
/// Credentials are never allowed.
pub fn build_cors(config: &AppConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_any_header()
        .expose_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE_SECS);

    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        config
            .cors_origins()
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
