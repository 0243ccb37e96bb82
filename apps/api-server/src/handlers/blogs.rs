//! Blog post handlers. Every route is owner-scoped.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use scribe_shared::dto::{BlogIdParams, CreateBlogRequest, UpdateBlogRequest};
use scribe_shared::{ApiResponse, Validated, shapes};

use super::path_params;
use crate::middleware::auth::Authenticated;
use crate::middleware::error::AppResult;
use crate::routes::{DocumentedScope, Endpoint};
use crate::state::AppState;

pub fn scope() -> DocumentedScope {
    DocumentedScope::new("/api/blogs", "Blogs")
        .route(
            Endpoint::post("", "Create a blog post")
                .secured()
                .body(&shapes::CREATE_BLOG)
                .returns(&shapes::BLOG)
                .status(201),
            create,
        )
        .route(
            Endpoint::get("", "List your blog posts")
                .secured()
                .returns_list(&shapes::BLOG),
            list,
        )
        .route(
            Endpoint::get("/{id}", "Get one of your blog posts")
                .secured()
                .params(&shapes::BLOG_ID)
                .returns(&shapes::BLOG),
            get,
        )
        .route(
            Endpoint::put("/{id}", "Update one of your blog posts")
                .secured()
                .params(&shapes::BLOG_ID)
                .body(&shapes::UPDATE_BLOG)
                .returns(&shapes::BLOG),
            update,
        )
        .route(
            Endpoint::delete("/{id}", "Delete one of your blog posts")
                .secured()
                .params(&shapes::BLOG_ID),
            delete,
        )
}

/// POST /api/blogs
async fn create(
    caller: Authenticated,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let input = CreateBlogRequest::from_json(body.into_inner())?;
    let post = state.blogs.create(&caller.user, input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/blogs
async fn list(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.blogs.list(caller.user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/blogs/{id}
async fn get(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let params: BlogIdParams = path_params(path)?;
    let post = state.blogs.get(caller.user.id, params.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PUT /api/blogs/{id}
async fn update(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let params: BlogIdParams = path_params(path)?;
    let input = UpdateBlogRequest::from_json(body.into_inner())?;
    let post = state.blogs.update(caller.user.id, params.id, input).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/blogs/{id}
async fn delete(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let params: BlogIdParams = path_params(path)?;
    let message = state.blogs.delete(caller.user.id, params.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(message)))
}
