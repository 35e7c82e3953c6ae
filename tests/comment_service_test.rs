//! Comment threading and moderation over the in-memory store.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use blog_api::domain::{PostDraft, User, UserRole};
use blog_api::errors::AppError;
use blog_api::services::{CommentManager, CommentService, PostManager, PostService};

use common::{principal_of, MemoryUnitOfWork, RecordingAssetStore};

struct Blog {
    uow: Arc<MemoryUnitOfWork>,
    comments: CommentManager<MemoryUnitOfWork>,
    posts: PostManager<MemoryUnitOfWork>,
    author: User,
    reader: User,
    admin: User,
}

impl Blog {
    fn new() -> Self {
        let uow = MemoryUnitOfWork::new();
        let assets = Arc::new(RecordingAssetStore::default());
        Self {
            comments: CommentManager::new(uow.clone()),
            posts: PostManager::new(uow.clone(), assets),
            author: uow.db.seed_user("Ann", UserRole::User),
            reader: uow.db.seed_user("Bob", UserRole::User),
            admin: uow.db.seed_user("Root", UserRole::Admin),
            uow,
        }
    }

    async fn post(&self, title: &str) -> Uuid {
        self.posts
            .create_post(
                principal_of(&self.author),
                PostDraft {
                    title: title.to_string(),
                    content: "Content".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .post
            .id
    }

    /// Comment as `user`, approved by the admin if needed.
    async fn approved(&self, user: &User, post_id: Uuid, parent: Option<Uuid>, text: &str) -> Uuid {
        let created = self
            .comments
            .create_comment(principal_of(user), post_id, parent, text.to_string())
            .await
            .unwrap();
        self.comments
            .approve_comment(created.comment.id)
            .await
            .unwrap();
        created.comment.id
    }
}

#[tokio::test]
async fn test_user_comment_awaits_moderation() {
    let blog = Blog::new();
    let post_id = blog.post("Hello").await;

    let created = blog
        .comments
        .create_comment(principal_of(&blog.reader), post_id, None, "Nice".to_string())
        .await
        .unwrap();

    assert!(!created.comment.is_approved);
    assert_eq!(created.author.unwrap().name, "Bob");
    assert!(blog.comments.list_for_post(post_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_comment_is_approved_immediately() {
    let blog = Blog::new();
    let post_id = blog.post("Hello").await;

    let created = blog
        .comments
        .create_comment(principal_of(&blog.admin), post_id, None, "Pinned".to_string())
        .await
        .unwrap();

    assert!(created.comment.is_approved);
    let threads = blog.comments.list_for_post(post_id).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.content, "Pinned");
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let blog = Blog::new();
    let err = blog
        .comments
        .create_comment(principal_of(&blog.reader), Uuid::new_v4(), None, "?".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_reply_to_missing_parent() {
    let blog = Blog::new();
    let post_id = blog.post("Hello").await;

    let err = blog
        .comments
        .create_comment(
            principal_of(&blog.reader),
            post_id,
            Some(Uuid::new_v4()),
            "Reply".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(blog.uow.db.comment_count(), 0);
}

#[tokio::test]
async fn test_reply_parent_must_belong_to_same_post() {
    let blog = Blog::new();
    let first = blog.post("First").await;
    let second = blog.post("Second").await;
    let parent = blog.approved(&blog.reader, first, None, "On first").await;

    let err = blog
        .comments
        .create_comment(
            principal_of(&blog.reader),
            second,
            Some(parent),
            "Cross-post reply".to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(blog.uow.db.comment_count(), 1);
}

#[tokio::test]
async fn test_threads_show_only_approved_replies_in_order() {
    let blog = Blog::new();
    let post_id = blog.post("Threads").await;
    let top = blog.approved(&blog.reader, post_id, None, "Top").await;
    blog.approved(&blog.author, post_id, Some(top), "First reply").await;
    blog.comments
        .create_comment(
            principal_of(&blog.reader),
            post_id,
            Some(top),
            "Pending reply".to_string(),
        )
        .await
        .unwrap();
    blog.approved(&blog.reader, post_id, Some(top), "Second reply").await;
    // Unapproved top-level comments stay hidden with their replies
    blog.comments
        .create_comment(principal_of(&blog.reader), post_id, None, "Hidden".to_string())
        .await
        .unwrap();

    let threads = blog.comments.list_for_post(post_id).await.unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.content, "Top");
    let replies: Vec<_> = threads[0]
        .replies
        .iter()
        .map(|r| r.content.as_str())
        .collect();
    assert_eq!(replies, vec!["First reply", "Second reply"]);
    assert_eq!(threads[0].replies[0].author.as_ref().unwrap().name, "Ann");
}

#[tokio::test]
async fn test_threads_stop_at_one_level_of_replies() {
    let blog = Blog::new();
    let post_id = blog.post("Nesting").await;
    let top = blog.approved(&blog.reader, post_id, None, "Top").await;
    let reply = blog.approved(&blog.author, post_id, Some(top), "Reply").await;
    let nested = blog
        .approved(&blog.reader, post_id, Some(reply), "Reply to reply")
        .await;

    let threads = blog.comments.list_for_post(post_id).await.unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.id, top);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].id, reply);
    let shown: Vec<Uuid> = threads
        .iter()
        .flat_map(|t| std::iter::once(t.comment.id).chain(t.replies.iter().map(|r| r.id)))
        .collect();
    assert!(!shown.contains(&nested));
    // Still stored, just never listed
    assert!(blog.uow.db.comment(nested).unwrap().is_approved);
}

#[tokio::test]
async fn test_list_for_missing_post() {
    let blog = Blog::new();
    let err = blog
        .comments
        .list_for_post(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_edit_resets_approval_without_touching_replies() {
    let blog = Blog::new();
    let post_id = blog.post("Edits").await;
    let top = blog.approved(&blog.reader, post_id, None, "Original").await;
    let reply = blog.approved(&blog.author, post_id, Some(top), "Reply").await;

    let edited = blog
        .comments
        .update_comment(principal_of(&blog.reader), top, "Edited".to_string())
        .await
        .unwrap();

    assert_eq!(edited.content, "Edited");
    assert!(!edited.is_approved);
    assert!(blog.uow.db.comment(reply).unwrap().is_approved);
    assert!(blog.comments.list_for_post(post_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_the_author_may_edit() {
    let blog = Blog::new();
    let post_id = blog.post("Edits").await;
    let comment = blog.approved(&blog.reader, post_id, None, "Mine").await;

    for intruder in [&blog.author, &blog.admin] {
        let err = blog
            .comments
            .update_comment(principal_of(intruder), comment, "Hijacked".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
    assert_eq!(blog.uow.db.comment(comment).unwrap().content, "Mine");
}

#[tokio::test]
async fn test_delete_by_stranger_is_forbidden() {
    let blog = Blog::new();
    let post_id = blog.post("Deletes").await;
    let comment = blog.approved(&blog.reader, post_id, None, "Mine").await;

    let err = blog
        .comments
        .delete_comment(principal_of(&blog.author), comment)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    assert!(blog.uow.db.comment(comment).is_some());
}

#[tokio::test]
async fn test_admin_delete_cascades_to_replies() {
    let blog = Blog::new();
    let post_id = blog.post("Deletes").await;
    let top = blog.approved(&blog.reader, post_id, None, "Top").await;
    let reply = blog.approved(&blog.author, post_id, Some(top), "Reply").await;
    let nested = blog.approved(&blog.reader, post_id, Some(reply), "Nested").await;
    let other = blog.approved(&blog.author, post_id, None, "Other").await;

    blog.comments
        .delete_comment(principal_of(&blog.admin), top)
        .await
        .unwrap();

    assert!(blog.uow.db.comment(top).is_none());
    assert!(blog.uow.db.comment(reply).is_none());
    assert!(blog.uow.db.comment(nested).is_none());
    assert!(blog.uow.db.comment(other).is_some());
}

#[tokio::test]
async fn test_delete_missing_comment() {
    let blog = Blog::new();
    let err = blog
        .comments
        .delete_comment(principal_of(&blog.admin), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_approve_is_idempotent() {
    let blog = Blog::new();
    let post_id = blog.post("Moderation").await;
    let comment = blog.approved(&blog.reader, post_id, None, "Once").await;

    let again = blog.comments.approve_comment(comment).await.unwrap();
    assert!(again.is_approved);

    let err = blog
        .comments
        .approve_comment(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
