//! In-process document store with the same match semantics as the PostgreSQL store.

use super::{check_collection_name, Document, DocumentStore};
use crate::error::StoreError;
use crate::id::DocumentId;
use crate::query::{Condition, FieldMatch, Filter};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

/// Collections live in a map guarded by a lock; documents keep insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".into())
    }
}

/// A filter condition prepared once per `find` call.
enum Matcher<'a> {
    Exact(&'a Value),
    ContainsIgnoreCase(Regex),
}

struct CompiledCondition<'a> {
    field: &'a str,
    matcher: Matcher<'a>,
}

impl CompiledCondition<'_> {
    fn matches(&self, fields: &Map<String, Value>) -> bool {
        let Some(value) = fields.get(self.field) else {
            return false;
        };
        match &self.matcher {
            Matcher::Exact(expected) => value == *expected,
            Matcher::ContainsIgnoreCase(re) => value.as_str().map(|s| re.is_match(s)).unwrap_or(false),
        }
    }
}

fn compile(filter: &Filter) -> Result<Vec<CompiledCondition<'_>>, StoreError> {
    filter
        .conditions()
        .iter()
        .map(|Condition { field, matcher }| {
            let matcher = match matcher {
                FieldMatch::Exact(expected) => Matcher::Exact(expected),
                FieldMatch::ContainsIgnoreCase(needle) => Matcher::ContainsIgnoreCase(
                    RegexBuilder::new(&regex::escape(needle))
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| StoreError::Unavailable(format!("filter on {}: {}", field, e)))?,
                ),
            };
            Ok::<_, StoreError>(CompiledCondition { field, matcher })
        })
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<DocumentId, StoreError> {
        check_collection_name(collection)?;
        let id = DocumentId::generate();
        let mut guard = self.collections.write().map_err(|_| Self::poisoned())?;
        guard
            .entry(collection.to_string())
            .or_default()
            .push(Document { id, fields });
        Ok(id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<u32>,
    ) -> Result<Vec<Document>, StoreError> {
        check_collection_name(collection)?;
        let conditions = compile(filter)?;
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        let Some(docs) = guard.get(collection) else {
            return Ok(Vec::new());
        };
        let limit = limit.map(|n| n as usize).unwrap_or(usize::MAX);
        let mut out = Vec::new();
        for doc in docs {
            if out.len() >= limit {
                break;
            }
            if conditions.iter().all(|c| c.matches(&doc.fields)) {
                out.push(doc.clone());
            }
        }
        Ok(out)
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        check_collection_name(collection)?;
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }

    async fn list_collections(&self, limit: u32) -> Result<Vec<String>, StoreError> {
        let guard = self.collections.read().map_err(|_| Self::poisoned())?;
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names.truncate(limit as usize);
        Ok(names)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.collections.read().map(|_| ()).map_err(|_| Self::poisoned())
    }

    async fn database_name(&self) -> Result<String, StoreError> {
        Ok("memory".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn empty_filter_matches_everything_in_insertion_order() {
        let store = MemoryDocumentStore::new();
        let a = store.insert("customer", doc(json!({ "name": "A" }))).await.unwrap();
        let b = store.insert("customer", doc(json!({ "name": "B" }))).await.unwrap();
        assert_ne!(a, b);
        let found = store.find("customer", &Filter::new(), None).await.unwrap();
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[tokio::test]
    async fn substring_match_ignores_case_and_treats_needle_literally() {
        let store = MemoryDocumentStore::new();
        store.insert("customer", doc(json!({ "name": "Budi Santoso" }))).await.unwrap();
        store.insert("customer", doc(json!({ "name": "Ani (RT.02)" }))).await.unwrap();

        let budi = store
            .find("customer", &Filter::new().contains_ignore_case("name", "SANTO"), None)
            .await
            .unwrap();
        assert_eq!(budi.len(), 1);

        let literal = store
            .find("customer", &Filter::new().contains_ignore_case("name", "(rt.02)"), None)
            .await
            .unwrap();
        assert_eq!(literal.len(), 1);

        let dot = store
            .find("customer", &Filter::new().contains_ignore_case("name", "."), None)
            .await
            .unwrap();
        assert_eq!(dot.len(), 1);
    }

    #[test]
    fn compiled_filter_is_reused_across_documents() {
        let filter = Filter::new()
            .contains_ignore_case("name", "50%_off")
            .exact("meter_number", "M-7");
        let conditions = compile(&filter).unwrap();
        assert_eq!(conditions.len(), 2);
        let hit = doc(json!({ "name": "Promo 50%_OFF", "meter_number": "M-7" }));
        let wrong_meter = doc(json!({ "name": "promo 50%_off", "meter_number": "M-8" }));
        let no_literal = doc(json!({ "name": "promo 50 off", "meter_number": "M-7" }));
        let non_string = doc(json!({ "name": 50, "meter_number": "M-7" }));
        let matches = |d: &Map<String, Value>| conditions.iter().all(|c| c.matches(d));
        assert!(matches(&hit));
        assert!(!matches(&wrong_meter));
        assert!(!matches(&no_literal));
        assert!(!matches(&non_string));
    }

    #[tokio::test]
    async fn ping_succeeds_on_healthy_store() {
        assert!(MemoryDocumentStore::new().ping().await.is_ok());
    }

    #[tokio::test]
    async fn exact_match_and_limit() {
        let store = MemoryDocumentStore::new();
        for i in 0..5 {
            store
                .insert("reading", doc(json!({ "customer_id": "c1", "current_reading": i })))
                .await
                .unwrap();
        }
        store.insert("reading", doc(json!({ "customer_id": "c2" }))).await.unwrap();
        let filter = Filter::new().exact("customer_id", "c1");
        assert_eq!(store.find("reading", &filter, None).await.unwrap().len(), 5);
        let two = store.find("reading", &filter, Some(2)).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].fields["current_reading"], json!(0));
    }

    #[tokio::test]
    async fn missing_collection_is_empty_and_lookup_by_id() {
        let store = MemoryDocumentStore::new();
        assert!(store.find("reading", &Filter::new(), None).await.unwrap().is_empty());
        let id = store.insert("customer", doc(json!({ "name": "A" }))).await.unwrap();
        assert!(store.find_by_id("customer", &id).await.unwrap().is_some());
        assert!(store.find_by_id("customer", &DocumentId::generate()).await.unwrap().is_none());
        assert_eq!(store.list_collections(10).await.unwrap(), vec!["customer".to_string()]);
    }
}
