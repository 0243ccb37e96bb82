//! Persistence ports.
//!
//! Every lookup, update and delete takes the caller's id and matches it in the
//! same predicate as the row id. Implementations must evaluate both in one
//! statement: a row owned by someone else behaves exactly like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogChanges, BlogPost, User, UserChanges};
use crate::error::RepoError;

/// Blog post repository.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new post and return the stored row.
    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError>;

    /// All posts owned by `author_id`, oldest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<BlogPost>, RepoError>;

    /// `WHERE id = $1 AND author_id = $2`.
    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<BlogPost>, RepoError>;

    /// Apply `changes` to the matching row, returning it when one matched.
    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, RepoError>;

    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;
}

/// User profile repository. Profiles are visible only to themselves.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a profile. Fails with [`RepoError::Constraint`] if the id exists.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    /// Insert `user` unless a profile with its id already exists.
    async fn ensure(&self, user: User) -> Result<(), RepoError>;

    /// Profiles visible to `caller`.
    async fn list_visible(&self, caller: Uuid) -> Result<Vec<User>, RepoError>;

    /// `WHERE id = $1 AND id = $2`.
    async fn find_owned(&self, id: Uuid, caller: Uuid) -> Result<Option<User>, RepoError>;

    async fn update_owned(
        &self,
        id: Uuid,
        caller: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, RepoError>;

    async fn delete_owned(&self, id: Uuid, caller: Uuid) -> Result<bool, RepoError>;
}
