//! Qdrant backend tests
//!
//! These start a Qdrant container and are ignored by default:
//!
//! ```sh
//! cargo test -p domain_documents --test qdrant_test -- --ignored
//! ```

use std::sync::Arc;

use domain_documents::*;
use test_utils::{TestDataBuilder, TestQdrant};

fn service(qdrant: &TestQdrant) -> DocumentService<QdrantRepository> {
    let repo = QdrantRepository::new(QdrantConfig::new(qdrant.url())).unwrap();
    let embedder = Arc::new(HashingProvider::new(384).unwrap());
    DocumentService::new(repo, embedder)
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_qdrant_document_lifecycle() {
    let qdrant = TestQdrant::new().await;
    let service = service(&qdrant);
    let builder = TestDataBuilder::from_test_name("test_qdrant_document_lifecycle");
    let collection = builder.collection("docs");

    let info = service.create_collection(&collection).await.unwrap();
    assert_eq!(info.dimension, 384);

    service
        .insert_document(&collection, Some("doc1".into()), "Hello world, this is a test.")
        .await
        .unwrap();
    service
        .insert_document(&collection, Some("doc2".into()), "Another piece of text data.")
        .await
        .unwrap();

    let results = service.retrieve(&collection, "test", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, "doc1");

    service
        .update_document(&collection, "doc1", "Completely new words")
        .await
        .unwrap();
    let document = service.get_document(&collection, "doc1").await.unwrap();
    assert_eq!(document.text, "Completely new words");

    service.delete_document(&collection, "doc2").await.unwrap();
    let err = service
        .get_document(&collection, "doc2")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert!(service.delete_collection(&collection).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires Docker"]
async fn test_qdrant_collection_is_reused() {
    let qdrant = TestQdrant::new().await;
    let service = service(&qdrant);
    let builder = TestDataBuilder::from_test_name("test_qdrant_collection_is_reused");
    let collection = builder.collection("reuse");
    let doc_id = builder.doc_id(1);

    service.create_collection(&collection).await.unwrap();
    service
        .insert_document(&collection, Some(doc_id.clone()), "kept across get-or-create")
        .await
        .unwrap();

    let info = service.create_collection(&collection).await.unwrap();
    assert_eq!(info.points_count, 1);

    let err = service
        .update_document(&collection, "missing", "x")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
