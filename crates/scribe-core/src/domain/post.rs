use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blog post. Owned by exactly one user for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create a new post with a fresh id and `created_at == updated_at`.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, changes: BlogChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        self.updated_at = changes.updated_at.max(self.created_at);
    }
}

/// Fields written by an update. `None` leaves the column untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_timestamps_match() {
        let author = Uuid::new_v4();
        let post = BlogPost::new(author, "T".to_string(), "C".to_string());

        assert_eq!(post.author_id, author);
        assert_eq!(post.created_at, post.updated_at);
        assert_ne!(post.id, Uuid::nil());
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut post = BlogPost::new(Uuid::new_v4(), "T".to_string(), "C".to_string());
        let later = post.created_at + chrono::TimeDelta::seconds(5);

        post.apply(BlogChanges {
            title: Some("T2".to_string()),
            content: None,
            updated_at: later,
        });

        assert_eq!(post.title, "T2");
        assert_eq!(post.content, "C");
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn test_serializes_camel_case() {
        let post = BlogPost::new(Uuid::new_v4(), "T".to_string(), "C".to_string());
        let value = serde_json::to_value(&post).unwrap();

        assert!(value.get("authorId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(scribe_shared::shapes::BLOG.validate(&value).is_ok());
    }
}
