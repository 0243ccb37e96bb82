//! Authentication handlers. Credentials are checked by the identity provider.

use actix_web::{HttpResponse, web};
use serde_json::Value;

use scribe_shared::dto::{AuthTokens, LoginRequest};
use scribe_shared::{ApiResponse, Validated, shapes};

use crate::middleware::auth::Authenticated;
use crate::middleware::error::AppResult;
use crate::routes::{DocumentedScope, Endpoint};
use crate::state::AppState;

pub fn scope() -> DocumentedScope {
    DocumentedScope::new("/api/auth", "Auth")
        .route(
            Endpoint::post("/login", "Log in with email and password (non-production only)")
                .body(&shapes::LOGIN)
                .returns(&shapes::AUTH_TOKENS)
                .errors(&[401, 403]),
            login,
        )
        .route(
            Endpoint::post("/logout", "Revoke the current session").secured(),
            logout,
        )
}

/// POST /api/auth/login
///
/// The environment gate comes first, so a disabled endpoint answers 403 whatever
/// the body holds.
async fn login(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    state.auth.ensure_login_enabled()?;
    let credentials = LoginRequest::from_json(body.into_inner())?;
    let session = state.auth.login(credentials).await?;

    tracing::info!(user_id = %session.user.id, "User logged in");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthTokens::from(session))))
}

/// POST /api/auth/logout
async fn logout(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let message = state.auth.logout(&caller.token).await?;

    tracing::info!(user_id = %caller.user.id, "User logged out");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(message)))
}
