//! Domain entities - the core business objects.

mod identity;
mod post;
mod user;

pub use identity::{AuthUser, Session};
pub use post::{BlogChanges, BlogPost};
pub use user::{User, UserChanges};
