//! Collection records, request bodies and the stored-document wrapper.

mod customer;
mod reading;

pub use customer::{CreateCustomerRequest, Customer, CUSTOMER_COLLECTION};
pub use reading::{CreateReadingRequest, Reading, READING_COLLECTION};

use crate::id::DocumentId;
use serde::Serialize;

/// A record together with its store-assigned id, serialized as the record's
/// fields plus `_id` as a string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: T,
}

/// Response body of the create endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct CreatedId {
    pub id: String,
}

impl From<DocumentId> for CreatedId {
    fn from(id: DocumentId) -> Self {
        CreatedId { id: id.to_string() }
    }
}
