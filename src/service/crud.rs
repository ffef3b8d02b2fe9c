//! Generic create/find against any `DocumentStore`, converting between records and documents.

use crate::error::StoreError;
use crate::id::DocumentId;
use crate::model::Stored;
use crate::query::Filter;
use crate::store::{Document, DocumentStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub struct CrudService;

impl CrudService {
    /// Serialize `record` to a document, insert it and return the assigned id.
    pub async fn create<T: Serialize>(
        store: &dyn DocumentStore,
        collection: &str,
        record: &T,
    ) -> Result<DocumentId, StoreError> {
        let fields = match serde_json::to_value(record)? {
            Value::Object(m) => m,
            other => {
                return Err(StoreError::MalformedDocument {
                    collection: collection.to_string(),
                    reason: format!("record serialized to {}, expected object", other),
                })
            }
        };
        let id = store.insert(collection, fields).await?;
        tracing::info!(collection = %collection, id = %id, "document created");
        Ok(id)
    }

    /// Matching documents decoded as `T`, at most `limit`.
    pub async fn find<T: DeserializeOwned>(
        store: &dyn DocumentStore,
        collection: &str,
        filter: &Filter,
        limit: Option<u32>,
    ) -> Result<Vec<Stored<T>>, StoreError> {
        tracing::debug!(collection = %collection, filter = ?filter, limit = ?limit, "find");
        store
            .find(collection, filter, limit)
            .await?
            .into_iter()
            .map(|doc| decode(collection, doc))
            .collect()
    }

    /// First matching document, if any.
    pub async fn find_one<T: DeserializeOwned>(
        store: &dyn DocumentStore,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Stored<T>>, StoreError> {
        let mut found = Self::find(store, collection, filter, Some(1)).await?;
        Ok(found.pop())
    }

    pub async fn exists(store: &dyn DocumentStore, collection: &str, id: &DocumentId) -> Result<bool, StoreError> {
        Ok(store.find_by_id(collection, id).await?.is_some())
    }
}

fn decode<T: DeserializeOwned>(collection: &str, doc: Document) -> Result<Stored<T>, StoreError> {
    let record = serde_json::from_value(Value::Object(doc.fields)).map_err(|e| StoreError::MalformedDocument {
        collection: collection.to_string(),
        reason: format!("{} ({})", e, doc.id),
    })?;
    Ok(Stored { id: doc.id, record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, CUSTOMER_COLLECTION};
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn customer(name: &str, qr: &str) -> Customer {
        Customer {
            name: name.into(),
            address: "Jl. Sudirman 10".into(),
            meter_number: format!("M-{}", qr),
            qrcode_value: qr.into(),
            phone: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn create_then_find_one() {
        let store = MemoryDocumentStore::new();
        let id = CrudService::create(&store, CUSTOMER_COLLECTION, &customer("Rina", "QR-1"))
            .await
            .unwrap();
        CrudService::create(&store, CUSTOMER_COLLECTION, &customer("Joko", "QR-2"))
            .await
            .unwrap();

        let found: Option<Stored<Customer>> =
            CrudService::find_one(&store, CUSTOMER_COLLECTION, &crate::query::qr_filter("QR-1"))
                .await
                .unwrap();
        let found = found.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.record.name, "Rina");
        assert!(CrudService::exists(&store, CUSTOMER_COLLECTION, &id).await.unwrap());
    }

    #[tokio::test]
    async fn stored_record_serializes_with_string_id() {
        let store = MemoryDocumentStore::new();
        let id = CrudService::create(&store, CUSTOMER_COLLECTION, &customer("Rina", "QR-1"))
            .await
            .unwrap();
        let all: Vec<Stored<Customer>> = CrudService::find(&store, CUSTOMER_COLLECTION, &Filter::new(), None)
            .await
            .unwrap();
        let v = serde_json::to_value(&all[0]).unwrap();
        assert_eq!(v["_id"], json!(id.to_string()));
        assert_eq!(v["qrcode_value"], json!("QR-1"));
        assert_eq!(v["phone"], Value::Null);
    }

    #[tokio::test]
    async fn non_object_records_are_refused() {
        let store = MemoryDocumentStore::new();
        let err = CrudService::create(&store, CUSTOMER_COLLECTION, &42).await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument { .. }));
    }

    #[tokio::test]
    async fn undecodable_documents_surface_as_store_errors() {
        let store = MemoryDocumentStore::new();
        let fields = match json!({ "name": 7 }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        store.insert(CUSTOMER_COLLECTION, fields).await.unwrap();
        let res: Result<Vec<Stored<Customer>>, _> =
            CrudService::find(&store, CUSTOMER_COLLECTION, &Filter::new(), None).await;
        assert!(matches!(res, Err(StoreError::MalformedDocument { .. })));
    }
}
