use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthUser;

/// User profile. `id` is the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Row created only to hold the author's posts. Invisible to every profile
    /// operation until the user creates their profile over it.
    #[serde(skip)]
    pub provisional: bool,
}

impl User {
    pub fn new(id: Uuid, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            created_at: now,
            updated_at: now,
            provisional: false,
        }
    }

    /// Provisional profile for an authenticated user who never created one.
    pub fn placeholder(identity: &AuthUser) -> Self {
        let email = identity.email.clone().unwrap_or_default();
        let name: String = email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("user")
            .chars()
            .take(100)
            .collect();
        Self {
            provisional: true,
            ..Self::new(identity.id, name, email)
        }
    }

    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        self.updated_at = changes.updated_at.max(self.created_at);
    }
}

/// Fields written by a profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_uses_email_local_part() {
        let identity = AuthUser {
            id: Uuid::new_v4(),
            email: Some("ada@example.com".to_string()),
        };
        let user = User::placeholder(&identity);

        assert_eq!(user.id, identity.id);
        assert_eq!(user.name, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.provisional);
        assert!(!User::new(identity.id, "Ada".into(), "ada@example.com".into()).provisional);
    }

    #[test]
    fn test_placeholder_without_email() {
        let identity = AuthUser {
            id: Uuid::new_v4(),
            email: None,
        };
        assert_eq!(User::placeholder(&identity).name, "user");
    }
}
