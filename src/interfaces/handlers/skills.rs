use actix_web::{http::StatusCode, web, Responder};
use tracing::instrument;

use crate::{
    errors::AppError, handlers::envelope::ApiResponse, query::Params, use_cases::skills::SkillListing,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_skills(
    state: web::Data<AppState>,
    query: web::Query<Params>,
) -> Result<impl Responder, AppError> {
    let listing = state.skill_handler.list_skills(&query).await?;

    let message = match listing {
        SkillListing::Grouped(_) => "Skills retrieved and grouped successfully",
        SkillListing::Flat(_) => "Skills retrieved successfully",
    };

    Ok(ApiResponse::new(message, listing).respond(StatusCode::OK))
}
