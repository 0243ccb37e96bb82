//! User profile handlers. A caller only ever sees their own profile.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use scribe_shared::dto::{CreateUserRequest, UpdateUserRequest, UserIdParams};
use scribe_shared::{ApiResponse, Validated, shapes};

use super::path_params;
use crate::middleware::auth::Authenticated;
use crate::middleware::error::AppResult;
use crate::routes::{DocumentedScope, Endpoint};
use crate::state::AppState;

pub fn scope() -> DocumentedScope {
    DocumentedScope::new("/api/users", "Users")
        .route(
            Endpoint::post("", "Create your profile")
                .secured()
                .body(&shapes::CREATE_USER)
                .returns(&shapes::USER)
                .status(201)
                .errors(&[409]),
            create,
        )
        .route(
            Endpoint::get("", "List visible profiles")
                .secured()
                .returns_list(&shapes::USER),
            list,
        )
        .route(
            Endpoint::get("/{id}", "Get your profile")
                .secured()
                .params(&shapes::USER_ID)
                .returns(&shapes::USER),
            get,
        )
        .route(
            Endpoint::put("/{id}", "Update your profile")
                .secured()
                .params(&shapes::USER_ID)
                .body(&shapes::UPDATE_USER)
                .returns(&shapes::USER),
            update,
        )
        .route(
            Endpoint::delete("/{id}", "Delete your profile and its blog posts")
                .secured()
                .params(&shapes::USER_ID),
            delete,
        )
}

async fn create(
    caller: Authenticated,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let input = CreateUserRequest::from_json(body.into_inner())?;
    let user = state.users.create(&caller.user, input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

async fn list(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.list(caller.user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

async fn get(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let params: UserIdParams = path_params(path)?;
    let user = state.users.get(caller.user.id, params.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

async fn update(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let params: UserIdParams = path_params(path)?;
    let input = UpdateUserRequest::from_json(body.into_inner())?;
    let user = state.users.update(caller.user.id, params.id, input).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

async fn delete(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let params: UserIdParams = path_params(path)?;
    let message = state.users.delete(caller.user.id, params.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(message)))
}
