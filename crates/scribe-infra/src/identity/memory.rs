//! In-process identity provider for tests and offline development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{AuthUser, Session};
use scribe_core::ports::{IdentityError, IdentityProvider};

/// Accounts and issued tokens held in memory.
///
/// Can be switched into an "unavailable" mode to simulate a provider outage.
#[derive(Default)]
pub struct StaticIdentityProvider {
    accounts: RwLock<HashMap<String, (String, AuthUser)>>,
    sessions: RwLock<HashMap<String, AuthUser>>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account able to sign in with `password`.
    pub async fn add_account(&self, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.accounts
            .write()
            .await
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Issue a fresh access token for `user` without a sign-in.
    pub async fn issue_token(&self, user: &AuthUser) -> String {
        let token = format!("tok-{}", Uuid::new_v4().simple());
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());
        token
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError> {
        self.enter()?;
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("invalid JWT".to_string()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.enter()?;
        let user = match self.accounts.read().await.get(email) {
            Some((expected, user)) if expected == password => user.clone(),
            _ => return Err(IdentityError::Rejected("Invalid login credentials".to_string())),
        };

        let access_token = self.issue_token(&user).await;
        Ok(Session {
            access_token,
            refresh_token: format!("ref-{}", Uuid::new_v4().simple()),
            user,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.enter()?;
        match self.sessions.write().await.remove(token) {
            Some(_) => Ok(()),
            None => Err(IdentityError::Rejected("invalid JWT".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_token() {
        let provider = StaticIdentityProvider::new();
        let user = provider.add_account("ada@example.com", "secret").await;

        let session = provider.sign_in("ada@example.com", "secret").await.unwrap();
        assert_eq!(session.user, user);
        assert_eq!(provider.verify_token(&session.access_token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let provider = StaticIdentityProvider::new();
        provider.add_account("ada@example.com", "secret").await;

        let err = provider.sign_in("ada@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(ref m) if m == "Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let provider = StaticIdentityProvider::new();
        let user = provider.add_account("ada@example.com", "secret").await;
        let token = provider.issue_token(&user).await;

        provider.sign_out(&token).await.unwrap();
        assert!(provider.verify_token(&token).await.is_err());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_outage_mode() {
        let provider = StaticIdentityProvider::new();
        provider.set_unavailable(true);

        let err = provider.verify_token("anything").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unavailable(_)));
    }
}
