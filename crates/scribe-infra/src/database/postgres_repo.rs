//! PostgreSQL repository implementations.
//!
//! Ownership is part of every `WHERE` clause; no method reads a row first and
//! checks its owner afterwards.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use scribe_core::domain::{BlogChanges, BlogPost, User, UserChanges};
use scribe_core::error::RepoError;
use scribe_core::ports::{BlogRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresRepository, map_db_err};

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresRepository<BlogEntity>;

/// PostgreSQL user profile repository.
pub type PostgresUserRepository = PostgresRepository<UserEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            if local.chars().count() > 1 {
                format!("{first}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn insert(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let model = blog::ActiveModel::from(post)
            .insert(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<BlogPost>, RepoError> {
        let result = BlogEntity::find()
            .filter(blog::Column::AuthorId.eq(author_id))
            .order_by_asc(blog::Column::CreatedAt)
            .order_by_asc(blog::Column::Id)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        let result = BlogEntity::find()
            .filter(blog::Column::Id.eq(id))
            .filter(blog::Column::AuthorId.eq(author_id))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogPost>, RepoError> {
        let mut active = blog::ActiveModel {
            updated_at: Set(changes.updated_at.into()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }

        let updated = BlogEntity::update_many()
            .set(active)
            .filter(blog::Column::Id.eq(id))
            .filter(blog::Column::AuthorId.eq(author_id))
            .exec_with_returning(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = BlogEntity::delete_many()
            .filter(blog::Column::Id.eq(id))
            .filter(blog::Column::AuthorId.eq(author_id))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        tracing::debug!(user_email = %mask_email(&user.email), "Creating user profile");

        // A provisional row is taken over; a real profile is left untouched
        // and nothing comes back.
        let claim = OnConflict::column(user::Column::Id)
            .update_columns([
                user::Column::Name,
                user::Column::Email,
                user::Column::CreatedAt,
                user::Column::UpdatedAt,
                user::Column::Provisional,
            ])
            .action_and_where(Expr::col((UserEntity, user::Column::Provisional)).eq(true))
            .to_owned();

        let stored = UserEntity::insert(user::ActiveModel::from(user))
            .on_conflict(claim)
            .exec_with_returning_many(self.conn())
            .await
            .map_err(map_db_err)?;

        stored
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| RepoError::Constraint("users_pkey".to_string()))
    }

    async fn ensure(&self, user: User) -> Result<(), RepoError> {
        let inserted = UserEntity::insert(user::ActiveModel::from(user))
            .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
            .exec_without_returning(self.conn())
            .await
            .map_err(map_db_err)?;

        if inserted > 0 {
            tracing::debug!("Created provisional user profile");
        }
        Ok(())
    }

    async fn list_visible(&self, caller: Uuid) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.eq(caller))
            .filter(user::Column::Provisional.eq(false))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_owned(&self, id: Uuid, caller: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Id.eq(caller))
            .filter(user::Column::Provisional.eq(false))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        caller: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, RepoError> {
        let mut active = user::ActiveModel {
            updated_at: Set(changes.updated_at.into()),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }

        let updated = UserEntity::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Id.eq(caller))
            .filter(user::Column::Provisional.eq(false))
            .exec_with_returning(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }

    async fn delete_owned(&self, id: Uuid, caller: Uuid) -> Result<bool, RepoError> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Id.eq(caller))
            .filter(user::Column::Provisional.eq(false))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}
