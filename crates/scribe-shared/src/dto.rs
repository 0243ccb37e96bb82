//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{Shape, Validated};
use crate::shapes;

/// Request to create a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
}

impl Validated for CreateBlogRequest {
    const SHAPE: &'static Shape = &shapes::CREATE_BLOG;
}

/// Partial update of a blog post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateBlogRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Validated for UpdateBlogRequest {
    const SHAPE: &'static Shape = &shapes::UPDATE_BLOG;
}

/// `:id` path parameter of the blog routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlogIdParams {
    pub id: Uuid,
}

impl Validated for BlogIdParams {
    const SHAPE: &'static Shape = &shapes::BLOG_ID;
}

/// `:id` path parameter of the user routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserIdParams {
    pub id: Uuid,
}

impl Validated for UserIdParams {
    const SHAPE: &'static Shape = &shapes::USER_ID;
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validated for LoginRequest {
    const SHAPE: &'static Shape = &shapes::LOGIN;
}

/// Request to create the caller's user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl Validated for CreateUserRequest {
    const SHAPE: &'static Shape = &shapes::CREATE_USER;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

impl Validated for UpdateUserRequest {
    const SHAPE: &'static Shape = &shapes::UPDATE_USER;
}

/// Identity returned alongside a login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUserResponse,
}

/// Plain confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_blog_from_json_keeps_absent_fields_empty() {
        let req = UpdateBlogRequest::from_json(json!({ "title": "New", "extra": 1 })).unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.content.is_none());
        assert!(!req.is_empty());
    }

    #[test]
    fn test_update_blog_from_empty_json_fails() {
        assert!(UpdateBlogRequest::from_json(json!({})).is_err());
    }

    #[test]
    fn test_blog_id_params_parse() {
        let id = Uuid::new_v4();
        let params = BlogIdParams::from_json(json!({ "id": id.to_string() })).unwrap();
        assert_eq!(params.id, id);

        let err = BlogIdParams::from_json(json!({ "id": "not-a-uuid" })).unwrap_err();
        assert!(err.touches("id"));
    }

    #[test]
    fn test_auth_tokens_serialize_camel_case() {
        let tokens = AuthTokens {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user: AuthUserResponse {
                id: Uuid::nil(),
                email: Some("a@example.com".to_string()),
            },
        };
        let value = serde_json::to_value(&tokens).unwrap();

        assert_eq!(value["accessToken"], "a");
        assert_eq!(value["refreshToken"], "r");
        assert_eq!(value["user"]["email"], "a@example.com");
        assert!(crate::shapes::AUTH_TOKENS.validate(&value).is_ok());
    }
}
