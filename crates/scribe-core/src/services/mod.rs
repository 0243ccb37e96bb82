//! Services - owner-scoped business rules on top of the ports.

mod auth;
mod blog;
mod user;

pub use auth::{AuthService, bearer_token};
pub use blog::BlogService;
pub use user::UserService;
