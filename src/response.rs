//! Response helpers. Bodies are plain JSON values: `{id}`, arrays of documents, or a document/null.

use crate::id::DocumentId;
use crate::model::{CreatedId, Stored};
use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn created_id(id: DocumentId) -> (StatusCode, Json<CreatedId>) {
    (StatusCode::OK, Json(CreatedId::from(id)))
}

pub fn success_many<T: Serialize>(data: Vec<Stored<T>>) -> (StatusCode, Json<Vec<Stored<T>>>) {
    (StatusCode::OK, Json(data))
}

/// A single document, or JSON `null` when absent.
pub fn success_optional<T: Serialize>(data: Option<Stored<T>>) -> (StatusCode, Json<Option<Stored<T>>>) {
    (StatusCode::OK, Json(data))
}
