//! Health check endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

use scribe_shared::{Field, Rule, Shape};

use crate::routes::{DocumentedScope, Endpoint};

pub const HEALTH: Shape = Shape::object(
    "Health",
    &[
        Field::required("status", Rule::Text { min: 1, max: None }),
        Field::required("version", Rule::Text { min: 1, max: None }),
        Field::required("timestamp", Rule::DateTime),
    ],
);

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

pub fn scope() -> DocumentedScope {
    DocumentedScope::new("/health", "Health").route(
        Endpoint::get("", "Service health")
            .returns(&HEALTH)
            .raw(),
        health_check,
    )
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
