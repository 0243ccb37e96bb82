//! In-memory repositories - used by tests and local wiring without PostgreSQL.
//!
//! They honour the same owner predicates as the PostgreSQL implementations
//! and count every call so callers can assert that no data access happened.
//! Note: Data is lost on process restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{BlogChanges, BlogPost, User, UserChanges};
use scribe_core::error::RepoError;
use scribe_core::ports::{BlogRepository, UserRepository};

/// Blog posts kept in insertion order.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    rows: RwLock<Vec<BlogPost>>,
    calls: AtomicUsize,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn remove_by_author(&self, author_id: Uuid) {
        self.rows.write().await.retain(|p| p.author_id != author_id);
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        rows.push(post.clone());
        Ok(post)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<BlogPost>, RepoError> {
        self.touch();
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        self.touch();
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|p| p.id == id && p.author_id == author_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author_id)
            .map(|post| {
                post.apply(changes);
                post.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| !(p.id == id && p.author_id == author_id));
        Ok(rows.len() < before)
    }
}

/// User profiles. Optionally cascades profile deletion to a blog store,
/// mirroring the `ON DELETE CASCADE` foreign key.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<Vec<User>>,
    posts: Option<Arc<InMemoryBlogRepository>>,
    calls: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cascading_to(posts: Arc<InMemoryBlogRepository>) -> Self {
        Self {
            posts: Some(posts),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Same predicate as the SQL: `id = $1 AND id = $2 AND NOT provisional`.
fn visible(user: &User, id: Uuid, caller: Uuid) -> bool {
    user.id == id && user.id == caller && !user.provisional
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|u| u.id == user.id) {
            Some(existing) if existing.provisional => *existing = user.clone(),
            Some(_) => return Err(RepoError::Constraint("users_pkey".to_string())),
            None => rows.push(user.clone()),
        }
        Ok(user)
    }

    async fn ensure(&self, user: User) -> Result<(), RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        if !rows.iter().any(|u| u.id == user.id) {
            rows.push(user);
        }
        Ok(())
    }

    async fn list_visible(&self, caller: Uuid) -> Result<Vec<User>, RepoError> {
        self.touch();
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|u| u.id == caller && !u.provisional)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: Uuid, caller: Uuid) -> Result<Option<User>, RepoError> {
        self.touch();
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|u| visible(u, id, caller))
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        caller: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, RepoError> {
        self.touch();
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|u| visible(u, id, caller))
            .map(|user| {
                user.apply(changes);
                user.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, caller: Uuid) -> Result<bool, RepoError> {
        self.touch();
        let removed = {
            let mut rows = self.rows.write().await;
            let before = rows.len();
            rows.retain(|u| !visible(u, id, caller));
            rows.len() < before
        };

        if removed {
            if let Some(posts) = &self.posts {
                posts.remove_by_author(id).await;
            }
        }
        Ok(removed)
    }
}
