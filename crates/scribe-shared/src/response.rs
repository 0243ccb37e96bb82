//! Standardized API response envelopes.
//!
//! Successes are `{ "success": true, "data": ... }`; failures are
//! `{ "success": false, "error": "...", "details": [...] }`.

use serde::{Deserialize, Serialize};

use crate::schema::Violation;

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable summary, safe to show to clients.
    pub error: String,
    /// Structured violations, present for validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<Violation>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(details: Vec<Violation>) -> Self {
        Self::new("Validation error").with_details(details)
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}
