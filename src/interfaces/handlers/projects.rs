use actix_web::{http::StatusCode, web, Responder};
use tracing::instrument;

use crate::{errors::AppError, handlers::envelope::ApiResponse, query::Params, AppState};

#[instrument(skip(state, query))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<Params>,
) -> Result<impl Responder, AppError> {
    let page = state.project_handler.list_projects(&query).await?;

    Ok(ApiResponse::with_meta("Projects retrieved successfully", page.items, page.meta)
        .respond(StatusCode::OK))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;

    Ok(ApiResponse::new("Project retrieved successfully", project).respond(StatusCode::OK))
}
