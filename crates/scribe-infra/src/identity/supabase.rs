//! Supabase Auth (GoTrue) identity provider.
//!
//! Talks to `{url}/auth/v1` with the project's anon key. Tokens are never
//! cached: every protected request costs one `GET /user` round trip.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use uuid::Uuid;

use scribe_core::domain::{AuthUser, Session};
use scribe_core::ports::{IdentityError, IdentityProvider};

/// Supabase project configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Identity provider backed by Supabase Auth.
pub struct SupabaseIdentityProvider {
    client: reqwest::Client,
    config: SupabaseConfig,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        Self {
            id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    user: GoTrueUser,
}

/// GoTrue has used several error body layouts over time.
#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl SupabaseIdentityProvider {
    pub fn new(config: SupabaseConfig) -> Result<Self, IdentityError> {
        let client = build_client(&config.anon_key, None)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url.trim_end_matches('/'), path)
    }
}

/// Client sending the anon key, and the caller's token when given, on every
/// request.
fn build_client(anon_key: &str, token: Option<&str>) -> Result<reqwest::Client, IdentityError> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(anon_key)
        .map_err(|e| IdentityError::Unavailable(format!("invalid API key: {e}")))?;
    key.set_sensitive(true);
    headers.insert("apikey", key);

    if let Some(token) = token {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| IdentityError::Rejected("Malformed token".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| IdentityError::Unavailable(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> IdentityError {
    IdentityError::Unavailable(err.to_string())
}

/// Pull a human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<GoTrueError>(body)
        .ok()
        .and_then(|e| e.msg.or(e.error_description).or(e.message).or(e.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Identity provider error")
                .to_string()
        })
}

/// Server-side failures are faults; everything else is a refusal.
fn classify(status: StatusCode, body: &str) -> IdentityError {
    let message = error_message(status, body);
    if status.is_server_error() {
        IdentityError::Unavailable(format!("{status}: {message}"))
    } else {
        IdentityError::Rejected(message)
    }
}

async fn failure(response: reqwest::Response) -> IdentityError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify(status, &body)
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("No user for token: {e}")))?;

        Ok(user.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let err = failure(response).await;
            tracing::debug!(error = %err, "Sign-in refused");
            return Err(err);
        }

        let session: GoTrueSession = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("unexpected session payload: {e}")))?;

        Ok(Session {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: session.user.into(),
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        // A client scoped to this session, so the revocation acts as the caller.
        let client = build_client(&self.config.anon_key, Some(token))?;

        let response = client
            .post(self.endpoint("logout"))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(url: &str) -> SupabaseIdentityProvider {
        SupabaseIdentityProvider::new(SupabaseConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            provider("https://x.supabase.co/").endpoint("user"),
            "https://x.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_error_message_layouts() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, r#"{"code":400,"msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(status, r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
            "Email not confirmed"
        );
        assert_eq!(error_message(status, "not json"), "Bad Request");
    }

    #[test]
    fn test_classify_by_status() {
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, r#"{"msg":"invalid JWT"}"#),
            IdentityError::Rejected(ref m) if m == "invalid JWT"
        ));
        assert!(matches!(
            classify(StatusCode::BAD_GATEWAY, ""),
            IdentityError::Unavailable(_)
        ));
    }

    #[test]
    fn test_gotrue_user_drops_empty_email() {
        let user: GoTrueUser = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "email": "",
            "aud": "authenticated"
        }))
        .unwrap();

        assert_eq!(AuthUser::from(user).email, None);
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        assert!(matches!(
            build_client("anon", Some("bad\ntoken")),
            Err(IdentityError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        // port 9 (discard) on localhost is not expected to serve HTTP
        let err = provider("http://127.0.0.1:9")
            .verify_token("token")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Unavailable(_)));
    }
}
