use actix_web::{http::StatusCode, web, Responder};
use chrono::Utc;
use tracing::instrument;

use crate::{errors::AppError, handlers::envelope::ApiResponse, query::Params, AppState};

#[instrument(skip(state, query))]
pub async fn list_experiences(
    state: web::Data<AppState>,
    query: web::Query<Params>,
) -> Result<impl Responder, AppError> {
    let today = Utc::now().date_naive();
    let experiences = state.experience_handler.list_experiences(&query, today).await?;

    Ok(ApiResponse::new("Work experiences retrieved successfully", experiences).respond(StatusCode::OK))
}
