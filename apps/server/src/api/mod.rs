//! API endpoint modules.

pub mod analyses;
pub mod brain;
pub mod dashboard;
mod form;
pub mod health;
pub mod lead_groups;
pub mod leads;
pub mod openapi;
pub mod recordings;
pub mod websocket;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use websocket::configure_routes as configure_websocket_routes;

use actix_web::web;

/// Register every `/api/v1` resource route except health and the socket.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(recordings::configure_routes)
        .configure(analyses::configure_routes)
        .configure(leads::configure_routes)
        .configure(lead_groups::configure_routes)
        .configure(brain::configure_routes)
        .configure(dashboard::configure_routes);
}
