//! Integration tests for the SQLite document store.

mod common;

use fixit_core::error::RepairError;
use fixit_core::models::RepairDocument;
use fixit_core::store::DocumentStore;

use common::{sample_analysis, sample_photo, temp_store};

fn sample_document() -> RepairDocument {
    RepairDocument::assemble(sample_analysis(4), sample_photo().to_data_url())
}

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let (_tmp, store) = temp_store().await;
    let doc = sample_document();

    store.create(&doc).await.expect("create");
    let stored = store
        .get_by_id(&doc.repair_id)
        .await
        .expect("query")
        .expect("exists");

    assert_eq!(stored, doc);
    assert_eq!(stored.steps().len(), 4);
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let (_tmp, store) = temp_store().await;
    assert!(store.get_by_id("missing").await.expect("query").is_none());
}

#[tokio::test]
async fn test_create_is_upsert_by_id() {
    let (_tmp, store) = temp_store().await;
    let mut doc = sample_document();

    store.create(&doc).await.expect("create");
    doc.manual_url = Some("https://example.com/manual.pdf".to_string());
    // Duplicate submission with the same id must not fail or duplicate.
    store.create(&doc).await.expect("re-create");

    let all = store.list_all().await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(
        all[0].manual_url.as_deref(),
        Some("https://example.com/manual.pdf")
    );
}

#[tokio::test]
async fn test_list_public_filters_and_orders_newest_first() {
    let (_tmp, store) = temp_store().await;

    let private_doc = sample_document();
    store.create(&private_doc).await.expect("create");

    let mut older_public = sample_document();
    older_public.is_public = true;
    older_public.timestamp = "2023-01-01T00:00:00Z".parse().expect("timestamp");
    store.create(&older_public).await.expect("create");

    let mut newer_public = sample_document();
    newer_public.is_public = true;
    newer_public.timestamp = "2024-06-01T00:00:00Z".parse().expect("timestamp");
    store.create(&newer_public).await.expect("create");

    let publics = store.list_public().await.expect("list");
    assert_eq!(publics.len(), 2);
    assert_eq!(publics[0].repair_id, newer_public.repair_id);
    assert_eq!(publics[1].repair_id, older_public.repair_id);

    assert_eq!(store.list_all().await.expect("list").len(), 3);
}

#[tokio::test]
async fn test_update_requires_existing_document() {
    let (_tmp, store) = temp_store().await;
    let doc = sample_document();

    let err = store.update(&doc).await.expect_err("nothing to update");
    assert!(matches!(err, RepairError::DocumentNotFound { .. }));

    store.create(&doc).await.expect("create");
    let mut updated = doc.clone();
    updated.is_successful = Some(true);
    store.update(&updated).await.expect("update");

    let stored = store
        .get_by_id(&doc.repair_id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(stored.is_successful, Some(true));
}

#[tokio::test]
async fn test_delete_reports_whether_row_existed() {
    let (_tmp, store) = temp_store().await;
    let doc = sample_document();
    store.create(&doc).await.expect("create");

    assert!(store.delete(&doc.repair_id).await.expect("delete"));
    assert!(!store.delete(&doc.repair_id).await.expect("second delete"));
    assert!(store
        .get_by_id(&doc.repair_id)
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn test_optional_fields_survive_round_trip() {
    let (_tmp, store) = temp_store().await;
    let mut doc = sample_document();
    doc.analysis.safety_warning = Some("Wear gloves.".to_string());
    doc.ideal_view_image_url = Some("img://ideal".to_string());
    doc.analysis.steps[1].generated_image_url = Some("img://step-2".to_string());
    doc.is_successful = Some(false);

    store.create(&doc).await.expect("create");
    let stored = store
        .get_by_id(&doc.repair_id)
        .await
        .expect("query")
        .expect("exists");

    assert_eq!(stored, doc);
    assert_eq!(stored.analysis.steps[1].generated_image_url.as_deref(), Some("img://step-2"));
    assert!(stored.analysis.steps[0].generated_image_url.is_none());
}
