//! Service behaviour over the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use scribe_core::domain::AuthUser;
use scribe_core::{BlogService, DomainError, UserService};
use scribe_infra::{InMemoryBlogRepository, InMemoryUserRepository};
use scribe_shared::dto::{CreateBlogRequest, CreateUserRequest, UpdateBlogRequest, UpdateUserRequest};

struct Fixture {
    posts: Arc<InMemoryBlogRepository>,
    users: Arc<InMemoryUserRepository>,
    blogs: BlogService,
    profiles: UserService,
}

fn fixture() -> Fixture {
    let posts = Arc::new(InMemoryBlogRepository::new());
    let users = Arc::new(InMemoryUserRepository::cascading_to(posts.clone()));
    Fixture {
        blogs: BlogService::new(posts.clone(), users.clone()),
        profiles: UserService::new(users.clone()),
        posts,
        users,
    }
}

fn caller(email: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
    }
}

fn draft(title: &str) -> CreateBlogRequest {
    CreateBlogRequest {
        title: title.to_string(),
        content: "body".to_string(),
    }
}

#[tokio::test]
async fn test_create_stamps_owner_and_timestamps() {
    let fx = fixture();
    let alice = caller("alice@example.com");

    let post = fx.blogs.create(&alice, draft("Hello")).await.unwrap();

    assert_eq!(post.author_id, alice.id);
    assert_eq!(post.created_at, post.updated_at);
    assert_eq!(fx.blogs.list(alice.id).await.unwrap(), vec![post]);
}

fn profile(name: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_string(),
        email: "alice@example.com".to_string(),
    }
}

#[tokio::test]
async fn test_posting_first_leaves_profile_creatable() {
    let fx = fixture();
    let alice = caller("alice@example.com");

    fx.blogs.create(&alice, draft("One")).await.unwrap();
    fx.blogs.create(&alice, draft("Two")).await.unwrap();

    // the row backing the posts is not a profile yet
    assert!(fx.profiles.list(alice.id).await.unwrap().is_empty());
    assert!(matches!(
        fx.profiles.get(alice.id, alice.id).await,
        Err(DomainError::NotFound { entity: "User" })
    ));

    let user = fx.profiles.create(&alice, profile("Alice Smith")).await.unwrap();
    assert_eq!(user.name, "Alice Smith");
    assert_eq!(fx.profiles.list(alice.id).await.unwrap(), vec![user]);
    assert_eq!(fx.blogs.list(alice.id).await.unwrap().len(), 2);

    assert!(matches!(
        fx.profiles.create(&alice, profile("Again")).await,
        Err(DomainError::Conflict(ref m)) if m == "User already exists"
    ));
}

#[tokio::test]
async fn test_foreign_post_is_not_found_everywhere() {
    let fx = fixture();
    let alice = caller("alice@example.com");
    let bob = caller("bob@example.com");
    let post = fx.blogs.create(&alice, draft("Private")).await.unwrap();

    let update = UpdateBlogRequest {
        title: Some("Mine now".to_string()),
        content: None,
    };

    assert!(matches!(
        fx.blogs.get(bob.id, post.id).await,
        Err(DomainError::NotFound { entity: "Blog" })
    ));
    assert!(matches!(
        fx.blogs.update(bob.id, post.id, update).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.blogs.delete(bob.id, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(fx.blogs.list(bob.id).await.unwrap().is_empty());

    // untouched for the owner
    let still = fx.blogs.get(alice.id, post.id).await.unwrap();
    assert_eq!(still.title, "Private");
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let fx = fixture();
    let alice = caller("alice@example.com");
    let post = fx.blogs.create(&alice, draft("Gone")).await.unwrap();

    let message = fx.blogs.delete(alice.id, post.id).await.unwrap();
    assert_eq!(message.message, "Blog deleted successfully");
    assert!(matches!(
        fx.blogs.delete(alice.id, post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_empty_update_is_rejected_before_storage() {
    let fx = fixture();
    let before = fx.posts.calls();

    let empty = UpdateBlogRequest {
        title: None,
        content: None,
    };
    let err = fx
        .blogs
        .update(Uuid::new_v4(), Uuid::new_v4(), empty)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(fx.posts.calls(), before);
}

#[tokio::test]
async fn test_update_advances_updated_at_only() {
    let fx = fixture();
    let alice = caller("alice@example.com");
    let post = fx.blogs.create(&alice, draft("Draft")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let update = UpdateBlogRequest {
        title: None,
        content: Some("revised".to_string()),
    };
    let updated = fx.blogs.update(alice.id, post.id, update).await.unwrap();

    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.content, "revised");
    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at > post.updated_at);
}

#[tokio::test]
async fn test_duplicate_profile_conflicts() {
    let fx = fixture();
    let alice = caller("alice@example.com");

    let user = fx.profiles.create(&alice, profile("Alice")).await.unwrap();
    assert_eq!(user.id, alice.id);
    assert!(matches!(
        fx.profiles.create(&alice, profile("Alice")).await,
        Err(DomainError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_profile_is_private_and_delete_cascades() {
    let fx = fixture();
    let alice = caller("alice@example.com");
    let bob = caller("bob@example.com");
    fx.blogs.create(&alice, draft("Mine")).await.unwrap();
    fx.profiles.create(&alice, profile("Alice")).await.unwrap();

    assert!(fx.profiles.list(bob.id).await.unwrap().is_empty());
    assert!(matches!(
        fx.profiles.get(bob.id, alice.id).await,
        Err(DomainError::NotFound { entity: "User" })
    ));

    let rename = UpdateUserRequest {
        name: Some("Al".to_string()),
        email: None,
    };
    assert_eq!(fx.profiles.update(alice.id, alice.id, rename).await.unwrap().name, "Al");

    fx.profiles.delete(alice.id, alice.id).await.unwrap();
    assert!(fx.blogs.list(alice.id).await.unwrap().is_empty());
    assert!(fx.users.calls() > 0);
}
