//! User profile rules. A caller can only see and change their own profile.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use scribe_shared::ValidationError;
use scribe_shared::dto::{CreateUserRequest, MessageResponse, UpdateUserRequest};

use crate::domain::{AuthUser, User, UserChanges};
use crate::error::{DomainError, RepoError};
use crate::ports::UserRepository;

const ENTITY: &str = "User";

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create the caller's own profile.
    pub async fn create(
        &self,
        caller: &AuthUser,
        input: CreateUserRequest,
    ) -> Result<User, DomainError> {
        let user = User::new(caller.id, input.name, input.email);

        match self.users.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User profile created");
                Ok(user)
            }
            Err(RepoError::Constraint(_)) => {
                Err(DomainError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self, caller: Uuid) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list_visible(caller).await?)
    }

    pub async fn get(&self, caller: Uuid, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_owned(user_id, caller)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY))
    }

    pub async fn update(
        &self,
        caller: Uuid,
        user_id: Uuid,
        input: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        if input.is_empty() {
            return Err(ValidationError::single("", "custom", "At least one field is required").into());
        }

        let changes = UserChanges {
            name: input.name,
            email: input.email,
            updated_at: Utc::now(),
        };

        self.users
            .update_owned(user_id, caller, changes)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY))
    }

    /// Remove the profile. The database cascades to the user's posts.
    pub async fn delete(&self, caller: Uuid, user_id: Uuid) -> Result<MessageResponse, DomainError> {
        if !self.users.delete_owned(user_id, caller).await? {
            return Err(DomainError::not_found(ENTITY));
        }

        tracing::info!(%user_id, "User profile deleted");
        Ok(MessageResponse::new("User deleted successfully"))
    }
}
