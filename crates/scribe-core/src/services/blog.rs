//! Blog post rules. Every operation is scoped to the caller's id.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use scribe_shared::ValidationError;
use scribe_shared::dto::{CreateBlogRequest, MessageResponse, UpdateBlogRequest};

use crate::domain::{AuthUser, BlogChanges, BlogPost, User};
use crate::error::DomainError;
use crate::ports::{BlogRepository, UserRepository};

const ENTITY: &str = "Blog";

pub struct BlogService {
    posts: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Create a post owned by `author`.
    pub async fn create(
        &self,
        author: &AuthUser,
        input: CreateBlogRequest,
    ) -> Result<BlogPost, DomainError> {
        // blogs.author_id references users.id
        self.users.ensure(User::placeholder(author)).await?;

        let post = BlogPost::new(author.id, input.title, input.content);
        let post = self.posts.insert(post).await?;

        tracing::info!(blog_id = %post.id, author_id = %post.author_id, "Blog created");
        Ok(post)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<BlogPost>, DomainError> {
        Ok(self.posts.list_by_author(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid, blog_id: Uuid) -> Result<BlogPost, DomainError> {
        self.posts
            .find_owned(blog_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY))
    }

    /// Apply the provided fields and refresh `updated_at`.
    pub async fn update(
        &self,
        user_id: Uuid,
        blog_id: Uuid,
        input: UpdateBlogRequest,
    ) -> Result<BlogPost, DomainError> {
        if input.is_empty() {
            return Err(ValidationError::single("", "custom", "At least one field is required").into());
        }

        let changes = BlogChanges {
            title: input.title,
            content: input.content,
            updated_at: Utc::now(),
        };

        let post = self
            .posts
            .update_owned(blog_id, user_id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY))?;

        tracing::info!(blog_id = %post.id, "Blog updated");
        Ok(post)
    }

    pub async fn delete(&self, user_id: Uuid, blog_id: Uuid) -> Result<MessageResponse, DomainError> {
        if !self.posts.delete_owned(blog_id, user_id).await? {
            return Err(DomainError::not_found(ENTITY));
        }

        tracing::info!(%blog_id, "Blog deleted");
        Ok(MessageResponse::new("Blog deleted successfully"))
    }
}
