//! Service behaviour against the in-memory store and the hashing embedder.

use std::sync::Arc;

use domain_documents::*;

fn service() -> DocumentService<InMemoryVectorRepository> {
    let embedder = Arc::new(HashingProvider::new(384).unwrap());
    DocumentService::new(InMemoryVectorRepository::new(), embedder)
}

async fn seeded() -> DocumentService<InMemoryVectorRepository> {
    let service = service();
    service.create_collection("c").await.unwrap();
    service
        .insert_document("c", Some("doc1".into()), "Hello world, this is a test.")
        .await
        .unwrap();
    service
        .insert_document("c", Some("doc2".into()), "Another piece of text data.")
        .await
        .unwrap();
    service
}

#[tokio::test]
async fn test_retrieve_ranks_matching_document_first() {
    let service = seeded().await;

    let results = service.retrieve("c", "test", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, "doc1");
    assert_eq!(results[0].text, "Hello world, this is a test.");
    assert_eq!(results[1].doc_id, "doc2");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn test_exact_text_is_top_result() {
    let service = seeded().await;

    let results = service
        .retrieve("c", "Another piece of text data.", 1)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "doc2");
    assert!((results[0].score - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_update_replaces_text_for_later_queries() {
    let service = seeded().await;

    service
        .update_document("c", "doc1", "Rust ownership and borrowing")
        .await
        .unwrap();

    let results = service
        .retrieve("c", "Rust ownership and borrowing", 2)
        .await
        .unwrap();
    assert_eq!(results[0].doc_id, "doc1");
    assert_eq!(results[0].text, "Rust ownership and borrowing");

    let old = service
        .retrieve("c", "Hello world, this is a test.", 2)
        .await
        .unwrap();
    assert!(old.iter().all(|d| d.text != "Hello world, this is a test."));
    let doc1 = old.iter().find(|d| d.doc_id == "doc1").unwrap();
    assert!(doc1.score < 0.5);

    let document = service.get_document("c", "doc1").await.unwrap();
    assert_eq!(document.text, "Rust ownership and borrowing");
}

#[tokio::test]
async fn test_delete_removes_document_from_results() {
    let service = service();
    service
        .insert_document("solo", Some("only".into()), "a lonely document")
        .await
        .unwrap();

    service.delete_document("solo", "only").await.unwrap();

    let results = service
        .retrieve("solo", "a lonely document", 3)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_missing_document_is_not_found_and_collection_unchanged() {
    let service = seeded().await;
    let before = service.retrieve("c", "test", 10).await.unwrap();

    let err = service
        .update_document("c", "nope", "whatever")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = service.delete_document("c", "nope").await.unwrap_err();
    assert!(err.is_not_found());

    let after = service.retrieve("c", "test", 10).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_missing_collection_is_not_found() {
    let service = service();

    let err = service.retrieve("ghost", "test", 3).await.unwrap_err();
    assert!(matches!(err, DocumentError::CollectionNotFound(_)));

    let err = service.delete_document("ghost", "doc1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_collection_is_get_or_create() {
    let service = seeded().await;

    let info = service.create_collection("c").await.unwrap();

    assert_eq!(info.name, "c");
    assert_eq!(info.dimension, 384);
    assert_eq!(info.points_count, 2);
}

#[tokio::test]
async fn test_insert_without_id_generates_uuid() {
    let service = service();

    let id = service
        .insert_document("c", None, "generated id")
        .await
        .unwrap();

    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(
        service.get_document("c", &id).await.unwrap().text,
        "generated id"
    );
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let service = seeded().await;

    let err = service
        .insert_document("c", Some("doc1".into()), "again")
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentError::DocumentAlreadyExists { .. }));
    assert_eq!(
        service.get_document("c", "doc1").await.unwrap().text,
        "Hello world, this is a test."
    );
}

#[tokio::test]
async fn test_delete_collection_drops_documents() {
    let service = seeded().await;

    assert!(service.delete_collection("c").await.unwrap());
    assert!(!service.delete_collection("c").await.unwrap());

    let err = service.get_document("c", "doc1").await.unwrap_err();
    assert!(matches!(err, DocumentError::CollectionNotFound(_)));
}

#[tokio::test]
async fn test_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingProvider::new(384).unwrap());

    {
        let repo = InMemoryVectorRepository::with_persistence(dir.path())
            .await
            .unwrap();
        let service = DocumentService::new(repo, Arc::clone(&embedder));
        service
            .insert_document("kept", Some("doc1".into()), "persisted text")
            .await
            .unwrap();
        service.persist().await.unwrap();
    }

    let repo = InMemoryVectorRepository::with_persistence(dir.path())
        .await
        .unwrap();
    let service = DocumentService::new(repo, embedder);

    let results = service.retrieve("kept", "persisted text", 1).await.unwrap();
    assert_eq!(results[0].doc_id, "doc1");
}

#[tokio::test]
async fn test_failed_persistence_does_not_half_apply_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store");
    let repo = InMemoryVectorRepository::with_persistence(&store)
        .await
        .unwrap();
    let service = DocumentService::new(repo, Arc::new(HashingProvider::new(384).unwrap()));
    service
        .insert_document("c", Some("doc1".into()), "Hello world, this is a test.")
        .await
        .unwrap();

    std::fs::remove_dir_all(&store).unwrap();

    let err = service
        .insert_document("c", Some("doc2".into()), "Another piece of text data.")
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::Storage(_)));
    assert!(service.get_document("c", "doc2").await.unwrap_err().is_not_found());

    assert!(service
        .update_document("c", "doc1", "Completely new words")
        .await
        .is_err());
    assert_eq!(
        service.get_document("c", "doc1").await.unwrap().text,
        "Hello world, this is a test."
    );

    assert!(service.delete_document("c", "doc1").await.is_err());
    assert!(service.get_document("c", "doc1").await.is_ok());
}
