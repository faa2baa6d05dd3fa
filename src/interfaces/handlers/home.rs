use actix_web::{get, web, HttpResponse, Responder};

use crate::{constants::API_PREFIX, AppState};

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Portfolio API!",
        "name": state.config.name,
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api": API_PREFIX,
        "endpoints": [
            format!("GET {}/projects", API_PREFIX),
            format!("GET {}/projects/{{id}}", API_PREFIX),
            format!("GET {}/skills", API_PREFIX),
            format!("GET {}/experiences", API_PREFIX),
            format!("POST {}/contact_messages", API_PREFIX),
            "GET /up".to_string(),
        ]
    }))
}
