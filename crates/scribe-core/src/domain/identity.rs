//! Identities resolved by the external identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_shared::dto::{AuthTokens, AuthUserResponse};

/// A user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Tokens issued by the identity provider on sign-in.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl From<Session> for AuthTokens {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user: AuthUserResponse {
                id: session.user.id,
                email: session.user.email,
            },
        }
    }
}
