use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DocumentError, DocumentResult};

pub const MAX_COLLECTION_NAME_LEN: usize = 255;
pub const MAX_DOC_ID_LEN: usize = 256;
pub const MAX_TOP_N: u32 = 1000;
pub const DEFAULT_TOP_N: u32 = 3;
pub const DEFAULT_SEARCH_N: u32 = 5;

/// Letters, digits, dots, hyphens and underscores
static COLLECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("valid collection name regex"));

/// Custom validator for collection names
fn validate_collection_name(name: &str) -> Result<(), validator::ValidationError> {
    if !COLLECTION_NAME.is_match(name) {
        return Err(validator::ValidationError::new("invalid_collection_name"));
    }
    Ok(())
}

/// Checks a collection name outside of a request body.
pub fn check_collection_name(name: &str) -> DocumentResult<()> {
    if name.is_empty() || name.chars().count() > MAX_COLLECTION_NAME_LEN {
        return Err(DocumentError::Validation(format!(
            "collection_name must be between 1 and {} characters",
            MAX_COLLECTION_NAME_LEN
        )));
    }
    validate_collection_name(name).map_err(|_| {
        DocumentError::Validation(format!(
            "collection_name '{}' may only contain letters, digits, '.', '_' and '-'",
            name
        ))
    })
}

pub fn check_doc_id(doc_id: &str) -> DocumentResult<()> {
    if doc_id.is_empty() || doc_id.chars().count() > MAX_DOC_ID_LEN {
        return Err(DocumentError::Validation(format!(
            "doc_id must be between 1 and {} characters",
            MAX_DOC_ID_LEN
        )));
    }
    Ok(())
}

pub fn check_text(field: &str, text: &str) -> DocumentResult<()> {
    if text.is_empty() {
        return Err(DocumentError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn check_top_n(top_n: u32) -> DocumentResult<()> {
    if top_n == 0 || top_n > MAX_TOP_N {
        return Err(DocumentError::Validation(format!(
            "top_n must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(())
}

/// Stable point id for a caller-visible document id.
pub fn point_id(doc_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, doc_id.as_bytes())
}

/// HNSW index tuning applied when a collection is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HnswConfig {
    pub m: Option<u32>,
    pub ef_construct: Option<u32>,
}

impl HnswConfig {
    pub fn is_empty(&self) -> bool {
        self.m.is_none() && self.ef_construct.is_none()
    }
}

/// Collection configuration. Similarity is always cosine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorConfig {
    pub dimension: usize,
    #[serde(default)]
    pub hnsw: Option<HnswConfig>,
}

impl VectorConfig {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            hnsw: None,
        }
    }

    pub fn with_hnsw(mut self, hnsw: Option<HnswConfig>) -> Self {
        self.hnsw = hnsw.filter(|h| !h.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: usize,
    pub points_count: u64,
}

/// A stored document: its text, embedding and derived point id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: Uuid,
    pub doc_id: String,
    pub text: String,
    pub vector: Vec<f32>,
}

impl Point {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>, vector: Vec<f32>) -> Self {
        let doc_id = doc_id.into();
        Self {
            id: point_id(&doc_id),
            doc_id,
            text: text.into(),
            vector,
        }
    }
}

/// Nearest-neighbour query against one collection
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub vector: Vec<f32>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(vector: Vec<f32>, limit: usize) -> Self {
        Self { vector, limit }
    }
}

/// Document as returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    /// Document identifier
    #[schema(example = "doc1")]
    pub doc_id: String,
    /// Stored text
    #[schema(example = "Hello world, this is a test.")]
    pub text: String,
}

/// One ranked match, serialized as `[doc_id, text, score]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: String,
    pub text: String,
    /// `1 - cosine distance`
    pub score: f32,
}

impl Serialize for ScoredDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.doc_id, &self.text, self.score).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScoredDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (doc_id, text, score) = <(String, String, f32)>::deserialize(deserializer)?;
        Ok(Self {
            doc_id,
            text,
            score,
        })
    }
}

// ===== Action-style request/response DTOs =====

/// Query parameters naming a collection
#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CollectionParams {
    /// Collection name
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_collection_name")
    )]
    pub collection_name: String,
}

/// Request to insert a document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InsertDocumentRequest {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_collection_name")
    )]
    #[schema(example = "my_collection")]
    pub collection_name: String,
    /// Generated as a UUID v4 when omitted
    #[validate(length(min = 1, max = 256))]
    #[serde(default)]
    #[schema(example = "doc1")]
    pub doc_id: Option<String>,
    #[validate(length(min = 1))]
    #[schema(example = "Hello world, this is a test.")]
    pub text: String,
}

/// Request to replace the text of an existing document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentRequest {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_collection_name")
    )]
    #[schema(example = "my_collection")]
    pub collection_name: String,
    #[validate(length(min = 1, max = 256))]
    #[schema(example = "doc1")]
    pub doc_id: String,
    #[validate(length(min = 1))]
    #[schema(example = "Updated text.")]
    pub text: String,
}

/// Query parameters identifying a document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentParams {
    /// Collection name
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_collection_name")
    )]
    pub collection_name: String,
    /// Document identifier
    #[validate(length(min = 1, max = 256))]
    pub doc_id: String,
}

fn default_top_n() -> u32 {
    DEFAULT_TOP_N
}

/// Request for the documents most similar to a query text
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RetrieveRequest {
    #[validate(
        length(min = 1, max = 255),
        custom(function = "validate_collection_name")
    )]
    #[schema(example = "my_collection")]
    pub collection_name: String,
    #[validate(length(min = 1))]
    #[schema(example = "test")]
    pub query_text: String,
    #[serde(default = "default_top_n")]
    #[validate(range(min = 1, max = 1000))]
    #[schema(default = 3, minimum = 1, maximum = 1000)]
    pub top_n: u32,
}

/// Confirmation message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Document 'doc1' inserted.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Ranked matches as `[doc_id, text, score]` tuples, best first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RetrieveResponse {
    #[schema(
        value_type = Vec<Vec<serde_json::Value>>,
        example = json!([["doc1", "Hello world, this is a test.", 0.41]])
    )]
    pub results: Vec<ScoredDocument>,
}

// ===== Resource-style request/response DTOs =====

/// Request to store a new document under a generated id
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1))]
    #[schema(example = "A brand new sentence about Rust.")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentIdResponse {
    #[schema(example = "5f0c7a9e-2d8b-4a57-9c1e-3b6f2a8d4e10")]
    pub document_id: String,
}

fn default_search_n() -> u32 {
    DEFAULT_SEARCH_N
}

/// Similarity search parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchDocumentsParams {
    /// Text to match against stored documents
    #[validate(length(min = 1))]
    pub query_text: String,
    /// Number of results (default 5)
    #[serde(default = "default_search_n")]
    #[validate(range(min = 1, max = 1000))]
    pub n: u32,
}

/// Replacement text for a document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentTextRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Updated text.")]
    pub new_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_rules() {
        assert!(check_collection_name("my_collection").is_ok());
        assert!(check_collection_name("docs.v2-en").is_ok());
        assert!(check_collection_name("").is_err());
        assert!(check_collection_name("has space").is_err());
        assert!(check_collection_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_doc_id_length_counts_characters() {
        assert!(check_doc_id("").is_err());
        assert!(check_doc_id(&"é".repeat(MAX_DOC_ID_LEN)).is_ok());
        assert!(check_doc_id(&"é".repeat(MAX_DOC_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_top_n_bounds() {
        assert!(check_top_n(0).is_err());
        assert!(check_top_n(1).is_ok());
        assert!(check_top_n(1000).is_ok());
        assert!(check_top_n(1001).is_err());
    }

    #[test]
    fn test_point_id_is_stable_per_doc_id() {
        assert_eq!(point_id("doc1"), point_id("doc1"));
        assert_ne!(point_id("doc1"), point_id("doc2"));
        assert_eq!(Point::new("doc1", "t", vec![]).id, point_id("doc1"));
    }

    #[test]
    fn test_scored_document_serializes_as_tuple() {
        let scored = ScoredDocument {
            doc_id: "doc1".into(),
            text: "Hello".into(),
            score: 0.5,
        };
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json, serde_json::json!(["doc1", "Hello", 0.5]));

        let back: ScoredDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, scored);
    }

    #[test]
    fn test_retrieve_request_defaults_top_n() {
        let request: RetrieveRequest = serde_json::from_value(serde_json::json!({
            "collection_name": "c",
            "query_text": "test"
        }))
        .unwrap();
        assert_eq!(request.top_n, DEFAULT_TOP_N);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_insert_request_validates_optional_doc_id() {
        let request: InsertDocumentRequest = serde_json::from_value(serde_json::json!({
            "collection_name": "c",
            "doc_id": "",
            "text": "hello"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("doc_id"));

        let request: InsertDocumentRequest = serde_json::from_value(serde_json::json!({
            "collection_name": "bad name",
            "text": "hello"
        }))
        .unwrap();
        assert!(request.doc_id.is_none());
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("collection_name"));
    }

    #[test]
    fn test_vector_config_drops_empty_hnsw() {
        let config = VectorConfig::new(384).with_hnsw(Some(HnswConfig::default()));
        assert!(config.hnsw.is_none());

        let tuned = HnswConfig {
            m: Some(32),
            ef_construct: None,
        };
        assert_eq!(
            VectorConfig::new(384).with_hnsw(Some(tuned)).hnsw,
            Some(tuned)
        );
    }
}
