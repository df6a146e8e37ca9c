// Route exports
pub mod dashboard;
pub mod places;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(places::configure)
            .configure(dashboard::configure),
    );
}
