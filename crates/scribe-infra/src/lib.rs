//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `supabase` - Supabase (GoTrue) identity provider over HTTP

pub mod database;
pub mod identity;

// Re-exports - In-Memory
pub use database::{InMemoryBlogRepository, InMemoryUserRepository};
pub use identity::StaticIdentityProvider;

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresBlogRepository, PostgresUserRepository};
#[cfg(feature = "supabase")]
pub use identity::{SupabaseConfig, SupabaseIdentityProvider};
