use actix_web::{http::StatusCode, web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::contact_message::ContactMessagePayload,
    errors::{AppError, ErrorEnvelope},
    handlers::envelope::ApiResponse,
    use_cases::extractors::RequestClient,
    AppState,
};

const CREATED_MESSAGE: &str = "Your message has been sent successfully! Thank you for reaching out.";
const INVALID_MESSAGE: &str = "Failed to send message. Please check your input and try again.";
const FAILED_MESSAGE: &str = "An error occurred while sending your message. Please try again later.";

/// Every failure after the body is parsed is reported with this endpoint's
/// own wording: 422 for invalid input, 500 for anything else.
#[instrument(skip(state, client, payload))]
pub async fn create_contact_message(
    state: web::Data<AppState>,
    client: RequestClient,
    payload: web::Json<ContactMessagePayload>,
) -> HttpResponse {
    let request = payload.into_inner().into_request();

    match state.contact_handler.create_contact_message(request, client.0).await {
        Ok(message) => ApiResponse::new(CREATED_MESSAGE, message).respond(StatusCode::CREATED),
        Err(AppError::ValidationError(errors)) => {
            HttpResponse::UnprocessableEntity().json(ErrorEnvelope::new(INVALID_MESSAGE, errors))
        }
        Err(e) => {
            tracing::error!("Error creating contact message: {}", e);
            HttpResponse::InternalServerError().json(ErrorEnvelope::new(FAILED_MESSAGE, Vec::new()))
        }
    }
}
