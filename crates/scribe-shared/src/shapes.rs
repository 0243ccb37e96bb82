//! Every request and response shape exposed by the API.

use crate::schema::{Field, Rule, Shape};

pub const TITLE: Rule = Rule::Text {
    min: 1,
    max: Some(200),
};
pub const CONTENT: Rule = Rule::Text { min: 1, max: None };
pub const NAME: Rule = Rule::Text {
    min: 1,
    max: Some(100),
};
pub const PASSWORD: Rule = Rule::Text { min: 4, max: None };
const ANY_TEXT: Rule = Rule::Text { min: 0, max: None };

// Requests

pub const CREATE_BLOG: Shape = Shape::object(
    "CreateBlog",
    &[
        Field::required("title", TITLE),
        Field::required("content", CONTENT),
    ],
);

pub const UPDATE_BLOG: Shape = Shape::object(
    "UpdateBlog",
    &[
        Field::optional("title", TITLE),
        Field::optional("content", CONTENT),
    ],
)
.require_any();

pub const BLOG_ID: Shape = Shape::object(
    "BlogId",
    &[Field::required("id", Rule::Uuid).describe("Blog identifier")],
);

pub const USER_ID: Shape = Shape::object(
    "UserId",
    &[Field::required("id", Rule::Uuid).describe("User identifier")],
);

pub const LOGIN: Shape = Shape::object(
    "Login",
    &[
        Field::required("email", Rule::Email),
        Field::required("password", PASSWORD),
    ],
);

pub const CREATE_USER: Shape = Shape::object(
    "CreateUser",
    &[
        Field::required("name", NAME),
        Field::required("email", Rule::Email),
    ],
);

pub const UPDATE_USER: Shape = Shape::object(
    "UpdateUser",
    &[
        Field::optional("name", NAME),
        Field::optional("email", Rule::Email),
    ],
)
.require_any();

// Responses

pub const BLOG: Shape = Shape::object(
    "Blog",
    &[
        Field::required("id", Rule::Uuid),
        Field::required("title", ANY_TEXT),
        Field::required("content", ANY_TEXT),
        Field::required("authorId", Rule::Uuid),
        Field::required("createdAt", Rule::DateTime)
            .describe("ISO timestamp the blog was created"),
        Field::required("updatedAt", Rule::DateTime)
            .describe("ISO timestamp the blog was last updated"),
    ],
);

pub const USER: Shape = Shape::object(
    "User",
    &[
        Field::required("id", Rule::Uuid),
        Field::required("name", ANY_TEXT),
        Field::required("email", Rule::Email),
        Field::required("createdAt", Rule::DateTime),
        Field::required("updatedAt", Rule::DateTime),
    ],
);

pub const AUTH_USER: Shape = Shape::object(
    "AuthUser",
    &[
        Field::optional("id", Rule::Uuid),
        Field::optional("email", Rule::Email).nullable(),
    ],
);

pub const AUTH_TOKENS: Shape = Shape::object(
    "AuthTokens",
    &[
        Field::optional("accessToken", ANY_TEXT).nullable(),
        Field::optional("refreshToken", ANY_TEXT).nullable(),
        Field::optional("user", Rule::Object(&AUTH_USER)).nullable(),
    ],
);

pub const MESSAGE: Shape = Shape::object(
    "MessageResponse",
    &[Field::required("message", ANY_TEXT)],
);

/// Shapes published as reusable OpenAPI components.
pub const COMPONENTS: &[&Shape] = &[
    &CREATE_BLOG,
    &UPDATE_BLOG,
    &LOGIN,
    &CREATE_USER,
    &UPDATE_USER,
    &BLOG,
    &USER,
    &AUTH_USER,
    &AUTH_TOKENS,
    &MESSAGE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_blog_rejects_empty_title() {
        let err = CREATE_BLOG.validate(&json!({ "title": "" })).unwrap_err();
        assert!(err.touches("title"));
        assert!(err.touches("content"));
    }

    #[test]
    fn test_create_blog_title_limit() {
        let at_limit = "t".repeat(200);
        let over_limit = "t".repeat(201);

        assert!(CREATE_BLOG
            .validate(&json!({ "title": at_limit, "content": "c" }))
            .is_ok());
        let err = CREATE_BLOG
            .validate(&json!({ "title": over_limit, "content": "c" }))
            .unwrap_err();
        assert_eq!(err.violations[0].code, "too_big");
    }

    #[test]
    fn test_update_blog_requires_a_field() {
        let err = UPDATE_BLOG.validate(&json!({})).unwrap_err();
        assert_eq!(err.violations[0].message, "At least one field is required");

        // unknown keys do not satisfy the rule
        assert!(UPDATE_BLOG.validate(&json!({ "author": "x" })).is_err());
        assert!(UPDATE_BLOG.validate(&json!({ "content": "new" })).is_ok());
    }

    #[test]
    fn test_update_blog_rejects_null_title() {
        let err = UPDATE_BLOG.validate(&json!({ "title": null })).unwrap_err();
        assert!(err.touches("title"));
    }

    #[test]
    fn test_login_rules() {
        assert!(LOGIN
            .validate(&json!({ "email": "a@example.com", "password": "abcd" }))
            .is_ok());

        let err = LOGIN
            .validate(&json!({ "email": "not-an-email", "password": "abc" }))
            .unwrap_err();
        assert!(err.touches("email"));
        assert!(err.touches("password"));
    }

    #[test]
    fn test_update_user_is_partial_create_user() {
        for field in CREATE_USER.fields {
            let partial = UPDATE_USER.field(field.name).unwrap();
            assert_eq!(partial.rule, field.rule);
            assert!(!partial.required);
        }
        assert!(UPDATE_USER.require_any);
    }

    #[test]
    fn test_blog_id_requires_uuid() {
        assert!(BLOG_ID.validate(&json!({ "id": "123" })).is_err());
        assert!(BLOG_ID
            .validate(&json!({ "id": "00000000-0000-0000-0000-000000000000" }))
            .is_ok());
    }
}
