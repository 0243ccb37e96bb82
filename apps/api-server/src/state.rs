//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{BlogRepository, IdentityProvider, UserRepository};
use scribe_core::{AuthService, BlogService, UserService};
use scribe_infra::database;
use scribe_infra::{PostgresBlogRepository, PostgresUserRepository, SupabaseIdentityProvider};

use crate::config::AppConfig;

/// Shared application state. Cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub blogs: Arc<BlogService>,
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire services over explicit adapters.
    pub fn from_parts(
        posts: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityProvider>,
        login_enabled: bool,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(identity, login_enabled)),
            blogs: Arc::new(BlogService::new(posts, users.clone())),
            users: Arc::new(UserService::new(users)),
        }
    }

    /// Build the production state: one database pool and one identity client
    /// for the whole process. The pool closes when the last repository drops.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let db = Arc::new(database::connect(&config.database).await?);
        let identity = SupabaseIdentityProvider::new(config.supabase.clone())?;

        if config.env.allows_login() {
            tracing::warn!(
                env = ?config.env,
                "Password login endpoint is enabled; this is an application policy, not a network restriction"
            );
        }

        let state = Self::from_parts(
            Arc::new(PostgresBlogRepository::new(db.clone())),
            Arc::new(PostgresUserRepository::new(db.clone())),
            Arc::new(identity),
            config.env.allows_login(),
        );

        tracing::info!("Application state initialized");
        Ok(state)
    }
}
