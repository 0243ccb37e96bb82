//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod health;
mod users;

use actix_web::{HttpResponse, web};
use serde_json::json;

use scribe_shared::{Validated, ValidationError};

use crate::docs;
use crate::middleware::error::{AppError, AppResult};
use crate::routes::{DocumentedScope, RouteDoc};

/// Every documented scope the server exposes.
pub fn api() -> Vec<DocumentedScope> {
    vec![
        blogs::scope(),
        users::scope(),
        auth::scope(),
        health::scope(),
    ]
}

/// Documentation of every route in [`api`].
pub fn route_docs() -> Vec<RouteDoc> {
    api()
        .into_iter()
        .flat_map(|scope| scope.finish().1)
        .collect()
}

/// Configure all application routes, plus the OpenAPI document describing them.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let mut routes = Vec::new();
    for scope in api() {
        let (scope, docs) = scope.finish();
        routes.extend(docs);
        cfg.service(scope);
    }

    cfg.app_data(web::Data::new(docs::build(&routes)))
        .route("/api-docs/openapi.json", web::get().to(docs::serve))
        .default_service(web::to(not_found));
}

/// Parse a single path segment through its params shape.
fn path_params<T: Validated>(path: web::Path<String>) -> Result<T, ValidationError> {
    T::from_json(json!({ "id": path.into_inner() }))
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}
