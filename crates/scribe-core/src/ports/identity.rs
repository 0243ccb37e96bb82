//! Identity provider port.
//!
//! Tokens are issued, refreshed and revoked by the provider; this service
//! only forwards credentials and asks who a bearer token belongs to.

use async_trait::async_trait;

use crate::domain::{AuthUser, Session};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user a bearer token belongs to.
    async fn verify_token(&self, token: &str) -> Result<AuthUser, IdentityError>;

    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
}

/// Identity provider errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider answered and refused: bad credentials, expired token.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or failed internally.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}
