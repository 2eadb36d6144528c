mod client;
mod config;

pub use client::QdrantRepository;
pub use config::{DEFAULT_QDRANT_TIMEOUT_SECS, DEFAULT_QDRANT_URL, QdrantConfig};
