//! Category management over the in-memory store.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use blog_api::domain::{CategoryChanges, PostDraft, UserRole};
use blog_api::errors::AppError;
use blog_api::services::{CategoryManager, CategoryService, PostManager, PostService};

use common::{principal_of, MemoryUnitOfWork, RecordingAssetStore};

fn setup() -> (Arc<MemoryUnitOfWork>, CategoryManager<MemoryUnitOfWork>) {
    let uow = MemoryUnitOfWork::new();
    let service = CategoryManager::new(uow.clone());
    (uow, service)
}

#[tokio::test]
async fn test_create_derives_slug() {
    let (_, service) = setup();

    let category = service
        .create_category("  Web Development ".to_string(), None, None, None)
        .await
        .unwrap();

    assert_eq!(category.name, "Web Development");
    assert_eq!(category.slug, "web-development");
}

#[tokio::test]
async fn test_duplicate_name_or_slug_conflicts() {
    let (_, service) = setup();
    service
        .create_category("Rust".to_string(), None, None, None)
        .await
        .unwrap();

    let same_name = service
        .create_category("Rust".to_string(), Some("other".to_string()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(same_name, AppError::Conflict(_)));

    let same_slug = service
        .create_category("Rust Lang".to_string(), Some("Rust".to_string()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(same_slug, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_names_sharing_a_slug_are_disambiguated() {
    let (_, service) = setup();
    let c = service
        .create_category("C".to_string(), None, None, None)
        .await
        .unwrap();
    let cpp = service
        .create_category("C++".to_string(), None, None, None)
        .await
        .unwrap();

    assert_eq!(c.slug, "c");
    assert!(cpp.slug.starts_with("c-"));
    assert_ne!(cpp.slug, c.slug);
    assert_eq!(service.list_categories().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_latin_name_keeps_its_letters() {
    let (_, service) = setup();

    let category = service
        .create_category("برمجة".to_string(), None, None, None)
        .await
        .unwrap();

    assert_eq!(category.name, "برمجة");
    assert_eq!(category.slug, "برمجة");
}

#[tokio::test]
async fn test_symbol_only_name_gets_generated_slug() {
    let (_, service) = setup();

    let category = service
        .create_category("+++".to_string(), None, None, None)
        .await
        .unwrap();

    assert!(!category.slug.is_empty());
    assert!(category.slug.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_blank_name_or_slug_is_rejected() {
    let (_, service) = setup();

    let blank_name = service
        .create_category("   ".to_string(), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(blank_name, AppError::Validation(_)));

    let blank_slug = service
        .create_category("Go".to_string(), Some("--".to_string()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(blank_slug, AppError::Validation(_)));
}

#[tokio::test]
async fn test_list_is_ordered_by_name() {
    let (_, service) = setup();
    for name in ["Zig", "Go", "Rust"] {
        service
            .create_category(name.to_string(), None, None, None)
            .await
            .unwrap();
    }

    let names: Vec<_> = service
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Go", "Rust", "Zig"]);
}

#[tokio::test]
async fn test_rename_regenerates_slug() {
    let (_, service) = setup();
    let category = service
        .create_category("Golang".to_string(), None, None, None)
        .await
        .unwrap();

    let updated = service
        .update_category(
            category.id,
            CategoryChanges {
                name: Some("Go Lang".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "go-lang");

    // Keeping its own name is not a conflict
    let same = service
        .update_category(
            category.id,
            CategoryChanges {
                name: Some("Go Lang".to_string()),
                description: Some("Gophers".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.description.as_deref(), Some("Gophers"));

    // Renaming onto a slug another category holds picks a suffixed one
    service
        .create_category("Rust".to_string(), None, None, None)
        .await
        .unwrap();
    let renamed = service
        .update_category(
            category.id,
            CategoryChanges {
                name: Some("Rust!".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(renamed.slug.starts_with("rust-"));
}

#[tokio::test]
async fn test_update_into_existing_name_conflicts() {
    let (_, service) = setup();
    service
        .create_category("Rust".to_string(), None, None, None)
        .await
        .unwrap();
    let go = service
        .create_category("Go".to_string(), None, None, None)
        .await
        .unwrap();

    let err = service
        .update_category(
            go.id,
            CategoryChanges {
                name: Some("Rust".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_missing_category() {
    let (_, service) = setup();
    let id = Uuid::new_v4();

    assert!(matches!(
        service.get_category(id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        service
            .update_category(id, CategoryChanges::default())
            .await
            .unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        service.delete_category(id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_delete_unlinks_posts() {
    let (uow, service) = setup();
    let posts = PostManager::new(uow.clone(), Arc::new(RecordingAssetStore::default()));
    let author = uow.db.seed_user("Ann", UserRole::User);
    let category = service
        .create_category("Rust".to_string(), None, None, None)
        .await
        .unwrap();
    let post = posts
        .create_post(
            principal_of(&author),
            PostDraft {
                title: "Tagged".to_string(),
                content: "Body".to_string(),
                category_ids: vec![category.id],
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .post;

    service.delete_category(category.id).await.unwrap();

    assert_eq!(uow.db.link_count(), 0);
    assert!(uow.db.post(post.id).is_some());
}
