use actix_web::web;

use crate::handlers::experiences;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/experiences")
            .route(web::get().to(experiences::list_experiences))
    );
}
