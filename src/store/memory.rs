//! In-memory document store.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::entity::{Document, Entity};
use crate::store::{DocumentStore, StoreError, UpsertOutcome};

/// Collections of documents held in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: IndexMap<String, IndexMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str, key: &str) -> Option<&Document> {
        self.collections.get(collection)?.get(key)
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.collections.values().all(|docs| docs.is_empty())
    }

    /// Documents of a collection, in first-insert order.
    pub fn documents<'a>(&'a self, collection: &str) -> impl Iterator<Item = (&'a str, &'a Document)> + 'a {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|docs| docs.iter().map(|(k, d)| (k.as_str(), d)))
    }

    /// Read back every document of an entity's collection as that entity.
    pub fn load_all<E: Entity + DeserializeOwned>(&self) -> Result<Vec<E>, StoreError> {
        self.documents(E::COLLECTION)
            .map(|(_, doc)| -> Result<E, StoreError> {
                Ok(serde_json::from_value(serde_json::to_value(doc)?)?)
            })
            .collect()
    }
}

impl DocumentStore for MemoryStore {
    fn put(
        &mut self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<UpsertOutcome, StoreError> {
        let docs = self.collections.entry(collection.to_string()).or_default();

        match docs.insert(key.to_string(), document) {
            Some(_) => Ok(UpsertOutcome::ReplacedExisting),
            None => Ok(UpsertOutcome::CreatedNew),
        }
    }
}
