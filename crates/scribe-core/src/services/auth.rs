//! Auth gateway: bearer token verification, login and logout.

use std::sync::Arc;

use scribe_shared::dto::{LoginRequest, MessageResponse};

use crate::domain::{AuthUser, Session};
use crate::error::DomainError;
use crate::ports::{IdentityError, IdentityProvider};

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    login_enabled: bool,
}

impl AuthService {
    /// `login_enabled` is a deployment policy, not a network restriction.
    pub fn new(identity: Arc<dyn IdentityProvider>, login_enabled: bool) -> Self {
        Self {
            identity,
            login_enabled,
        }
    }

    /// Resolve the caller behind an `Authorization` header.
    ///
    /// A missing or malformed header fails without contacting the provider.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<AuthUser, DomainError> {
        let token = bearer_token(header)
            .ok_or_else(|| DomainError::Unauthorized("No token provided".to_string()))?;

        match self.identity.verify_token(token).await {
            Ok(user) => Ok(user),
            Err(IdentityError::Rejected(reason)) => {
                tracing::debug!(%reason, "Bearer token rejected");
                Err(DomainError::Unauthorized(
                    "Invalid or expired token".to_string(),
                ))
            }
            Err(IdentityError::Unavailable(detail)) => {
                Err(DomainError::internal("Authentication failed", detail))
            }
        }
    }

    /// Refuse password login where the deployment disallows it. Callers check
    /// this before reading credentials.
    pub fn ensure_login_enabled(&self) -> Result<(), DomainError> {
        if self.login_enabled {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Login endpoint is not available in production".to_string(),
            ))
        }
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<Session, DomainError> {
        self.ensure_login_enabled()?;

        self.identity
            .sign_in(&credentials.email, &credentials.password)
            .await
            .map_err(|e| match e {
                IdentityError::Rejected(message) => DomainError::Unauthorized(message),
                IdentityError::Unavailable(detail) => {
                    DomainError::internal("Authentication failed", detail)
                }
            })
    }

    pub async fn logout(&self, token: &str) -> Result<MessageResponse, DomainError> {
        self.identity
            .sign_out(token)
            .await
            .map_err(|e| DomainError::internal("Internal server error", e.to_string()))?;

        Ok(MessageResponse::new("Logged out successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;

    /// Provider that accepts a single token and counts every call.
    struct OneTokenProvider {
        user: AuthUser,
        down: bool,
        calls: AtomicUsize,
    }

    impl OneTokenProvider {
        fn new(down: bool) -> Self {
            Self {
                user: AuthUser {
                    id: Uuid::new_v4(),
                    email: Some("a@example.com".to_string()),
                },
                down,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for OneTokenProvider {
        async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.down {
                return Err(IdentityError::Unavailable("connection refused".to_string()));
            }
            if token == "good" {
                Ok(self.user.clone())
            } else {
                Err(IdentityError::Rejected("invalid JWT".to_string()))
            }
        }

        async fn sign_in(&self, _email: &str, password: &str) -> Result<Session, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password != "secret" {
                return Err(IdentityError::Rejected("Invalid login credentials".to_string()));
            }
            Ok(Session {
                access_token: "good".to_string(),
                refresh_token: "refresh".to_string(),
                user: self.user.clone(),
            })
        }

        async fn sign_out(&self, _token: &str) -> Result<(), IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn service(down: bool, login_enabled: bool) -> (Arc<OneTokenProvider>, AuthService) {
        let provider = Arc::new(OneTokenProvider::new(down));
        let service = AuthService::new(provider.clone(), login_enabled);
        (provider, service)
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: "a@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_header_makes_no_provider_call() {
        let (provider, service) = service(false, true);

        for header in [None, Some("Basic abc"), Some("Bearer")] {
            let err = service.authenticate(header).await.unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "No token provided"));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (provider, service) = service(false, true);
        let user = service.authenticate(Some("Bearer good")).await.unwrap();
        assert_eq!(user, provider.user);
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let (_, service) = service(false, true);
        let err = service.authenticate(Some("Bearer bad")).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_provider_fault_is_internal() {
        let (_, service) = service(true, true);
        let err = service.authenticate(Some("Bearer good")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Internal {
                message: "Authentication failed",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_login_disabled_is_forbidden_without_provider_call() {
        let (provider, service) = service(false, false);
        let err = service.login(login("secret")).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_surfaces_provider_message() {
        let (_, service) = service(false, true);
        let err = service.login(login("wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");

        let session = service.login(login("secret")).await.unwrap();
        assert_eq!(session.access_token, "good");
    }

    #[tokio::test]
    async fn test_logout_confirms() {
        let (_, service) = service(false, true);
        let message = service.logout("good").await.unwrap();
        assert_eq!(message.message, "Logged out successfully");
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
