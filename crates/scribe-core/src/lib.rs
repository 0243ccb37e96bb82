//! # Scribe Core
//!
//! The domain layer of the Scribe blog API.
//! This crate contains entities, ports and the owner-scoped services, with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{AuthService, BlogService, UserService};
