//! Shared test utilities for domain testing
//!
//! - `TestQdrant`: Qdrant container with automatic cleanup (feature: "qdrant")
//! - `TestDataBuilder`: deterministic collection names and document ids (always available)
//!
//! # Usage
//!
//! Add `features = ["qdrant"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["qdrant"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestQdrant};
//!
//! #[tokio::test]
//! async fn my_qdrant_test() {
//!     let qdrant = TestQdrant::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_qdrant_test");
//!
//!     let collection = builder.collection("main");
//!     let doc_id = builder.doc_id(1);
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "qdrant")]
mod qdrant;

#[cfg(feature = "qdrant")]
pub use qdrant::TestQdrant;

/// Builder for test data with deterministic randomization
///
/// Tests sharing one Qdrant instance stay isolated by naming their
/// collections after the test.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_insert_document");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A collection name valid for the documents domain
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.collection("main"), "test-42-main");
    /// ```
    pub fn collection(&self, suffix: &str) -> String {
        format!("test-{}-{}", self.seed, suffix)
    }

    /// The `n`th document id of this test, as a UUID string
    pub fn doc_id(&self, n: u64) -> String {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(bytes).to_string()
    }
}
