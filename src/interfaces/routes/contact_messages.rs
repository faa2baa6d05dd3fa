use actix_web::web;

use crate::handlers::contact_messages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact_messages")
            .route(web::post().to(contact_messages::create_contact_message))
    );
}
