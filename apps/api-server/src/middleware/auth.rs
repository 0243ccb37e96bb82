//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use scribe_core::domain::AuthUser;
use scribe_core::services::bearer_token;

use super::error::AppError;
use crate::state::AppState;

/// The caller of a protected route, resolved by the identity provider.
///
/// List it first among a handler's arguments so authentication runs before
/// path and body validation:
/// ```ignore
/// async fn list(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
///     let blogs = state.blogs.list(caller.user.id).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: AuthUser,
    /// The bearer token the request was made with.
    pub token: String,
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();

        // A header that is not valid ASCII is treated as absent.
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let Some(state) = state else {
                return Err(AppError::internal("AppState not found in app data"));
            };

            let user = state.auth.authenticate(header.as_deref()).await?;
            let token = bearer_token(header.as_deref())
                .unwrap_or_default()
                .to_string();

            Ok(Self { user, token })
        })
    }
}
