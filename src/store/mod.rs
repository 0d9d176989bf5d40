//! Document store seam.
//!
//! The ingestion driver writes through [`DocumentStore`]; a real backend
//! lives outside this crate. [`MemoryStore`] is the in-process
//! implementation used by the CLI and the tests.

pub mod memory;

pub use memory::MemoryStore;

use std::fmt;

use crate::entity::{Document, Entity};

/// Result of writing a document under its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    CreatedNew,
    ReplacedExisting,
}

#[derive(Debug)]
pub enum StoreError {
    Serialization(serde_json::Error),
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StoreError::Backend(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Key/value document persistence with upsert semantics.
pub trait DocumentStore {
    /// Insert or fully replace the document stored under `key`.
    fn put(
        &mut self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Upsert an entity under the key it supplies.
    fn upsert<E: Entity>(&mut self, entity: &E) -> Result<UpsertOutcome, StoreError>
    where
        Self: Sized,
    {
        let document = entity.to_document()?;
        self.put(E::COLLECTION, entity.key(), document)
    }
}
