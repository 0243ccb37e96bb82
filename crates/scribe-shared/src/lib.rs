//! # Scribe Shared
//!
//! Shared types between frontend and backend: the declarative request and
//! response shapes, the request DTOs they validate into, and the response
//! envelopes every endpoint answers with.

pub mod dto;
pub mod response;
pub mod schema;
pub mod shapes;

pub use response::{ApiResponse, ErrorResponse};
pub use schema::{Field, Rule, Shape, Validated, ValidationError, Violation};
