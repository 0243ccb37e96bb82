//! # Scribe API Server
//!
//! HTTP layer: configuration, telemetry, the auth extractor, error
//! translation, documented routes and the OpenAPI document.

use actix_web::web;

pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

use middleware::error::json_error_handler;
use state::AppState;

/// Register state, body handling and every route on an actix `App`.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));
        handlers::configure_routes(cfg);
    }
}
