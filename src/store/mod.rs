//! Document store abstraction: collections of JSON documents keyed by a store-assigned id.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::{ensure_database_exists, PgDocumentStore};

use crate::error::StoreError;
use crate::id::DocumentId;
use crate::query::Filter;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A stored document: its id plus the field map it was inserted with.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the id the store assigned to it.
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<DocumentId, StoreError>;

    /// Documents matching every condition of `filter`, in insertion order, at most `limit`.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<u32>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Names of existing collections, sorted, at most `limit`.
    async fn list_collections(&self, limit: u32) -> Result<Vec<String>, StoreError>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn database_name(&self) -> Result<String, StoreError>;
}

/// Collection names become table names; only `[a-z_][a-z0-9_]*` is accepted.
pub(crate) fn check_collection_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    };
    if valid && name.len() <= 63 {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}
