//! Brain document upload and delete through the document library.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use call_intel_lib::error::AppError;
use call_intel_lib::services::{DocumentUpload, StorageBucket};
use chrono::Utc;
use uuid::Uuid;

use super::test_helpers::*;

const MAX_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

fn pdf(file_name: &str, len: usize) -> DocumentUpload {
    DocumentUpload {
        name: None,
        file_name: file_name.to_string(),
        content_type: Some("application/pdf".to_string()),
        data: vec![b'%'; len],
    }
}

#[actix_rt::test]
async fn test_upload_stores_under_user_and_timestamp() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments {
        brain_id: Some(Uuid::new_v4()),
        ..MemoryDocuments::default()
    });
    let library = document_library(store.clone(), objects.clone(), MAX_DOCUMENT_SIZE);
    let user = test_user();

    let before = Utc::now().timestamp_millis();
    let document = library
        .upload(&user, pdf("pitch deck.pdf", 2048))
        .await
        .expect("upload");
    let after = Utc::now().timestamp_millis();

    let (owner, rest) = document.storage_path.split_once('/').expect("owner prefix");
    assert_eq!(owner, user.id.to_string());
    let (millis, original) = rest.split_once('-').expect("timestamp prefix");
    let millis: i64 = millis.parse().expect("epoch millis");
    assert!((before..=after).contains(&millis));
    assert_eq!(original, "pitch deck.pdf");

    assert!(objects.contains(StorageBucket::Documents, &document.storage_path));
    assert!(!objects.contains(StorageBucket::Recordings, &document.storage_path));
    assert_eq!(document.file_name, "pitch deck");
    assert_eq!(document.file_type, "pdf");
    assert_eq!(document.file_size, Some(2048));
    assert_eq!(document.status, "uploaded");
    assert_eq!(document.company_brain_id, store.brain_id);
    assert_eq!(
        document.storage_url.as_deref(),
        Some(format!("http://objects.test/brain-documents/{}", document.storage_path).as_str())
    );
}

#[actix_rt::test]
async fn test_oversize_document_is_rejected_before_upload() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments::default());
    let library = document_library(store.clone(), objects.clone(), 1024);

    let err = library
        .upload(&test_user(), pdf("handbook.pdf", 1025))
        .await
        .expect_err("over the limit");

    assert!(matches!(err, AppError::PayloadTooLarge(_)));
    assert_eq!(objects.upload_count(), 0);
    assert_eq!(store.document_count(), 0);
}

/// A failed insert leaves the stored file behind.
#[actix_rt::test]
async fn test_insert_failure_leaves_object() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments::default());
    store.fail_insert.store(true, Ordering::SeqCst);
    let library = document_library(store.clone(), objects.clone(), MAX_DOCUMENT_SIZE);

    let err = library
        .upload(&test_user(), pdf("pricing.pdf", 10))
        .await
        .expect_err("insert fails");

    assert!(err.to_string().starts_with("Database error: "));
    assert_eq!(objects.upload_count(), 1);
    assert_eq!(store.document_count(), 0);
}

/// The stored file goes first, then the row.
#[actix_rt::test]
async fn test_delete_removes_object_before_row() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments::watching(objects.clone()));
    let library = document_library(store.clone(), objects.clone(), MAX_DOCUMENT_SIZE);
    let user = test_user();
    let document = library
        .upload(&user, pdf("faq.pdf", 64))
        .await
        .expect("upload");

    library.delete(&user, document.id).await.expect("delete");

    assert_eq!(*store.object_present_at_delete.lock().unwrap(), vec![false]);
    assert_eq!(objects.upload_count(), 0);
    assert!(library.list(&user).await.expect("list").is_empty());
}

/// Storage refusing the removal is logged; the row still goes.
#[actix_rt::test]
async fn test_delete_survives_object_removal_failure() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments::watching(objects.clone()));
    let library = document_library(store.clone(), objects.clone(), MAX_DOCUMENT_SIZE);
    let user = test_user();
    let document = library
        .upload(&user, pdf("case study.pdf", 64))
        .await
        .expect("upload");
    objects.fail_removals.store(true, Ordering::SeqCst);

    library
        .delete(&user, document.id)
        .await
        .expect("removal failure must not fail the delete");

    assert_eq!(store.document_count(), 0);
    assert!(objects.contains(StorageBucket::Documents, &document.storage_path));
}

#[actix_rt::test]
async fn test_delete_other_users_document_is_not_found() {
    let objects = Arc::new(MemoryObjects::new());
    let store = Arc::new(MemoryDocuments::default());
    let library = document_library(store.clone(), objects.clone(), MAX_DOCUMENT_SIZE);
    let owner = test_user();
    let document = library
        .upload(&owner, pdf("roadmap.pdf", 64))
        .await
        .expect("upload");

    let err = library
        .delete(&test_user(), document.id)
        .await
        .expect_err("foreign document");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.document_count(), 1);
    assert_eq!(objects.upload_count(), 1);
}
