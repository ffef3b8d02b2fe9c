//! Liveness message and database diagnostics.

use crate::error::StoreError;
use crate::state::AppState;
use crate::store::DocumentStore;
use axum::{extract::State, Json};
use serde::Serialize;

/// Max collection names reported by diagnostics.
pub const DIAGNOSTIC_COLLECTION_LIMIT: u32 = 10;

/// Max characters of an error message embedded in a diagnostic status.
const STATUS_ERROR_CHARS: usize = 50;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DiagnosticsBody {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: Option<String>,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

/// GET /
pub async fn root() -> Json<MessageBody> {
    Json(MessageBody {
        message: "Meter Reading API ready",
    })
}

fn truncated(err: &StoreError) -> String {
    err.to_string().chars().take(STATUS_ERROR_CHARS).collect()
}

/// Check the store; every failure becomes status text.
pub async fn diagnose(store: &dyn DocumentStore, database_url_set: bool) -> DiagnosticsBody {
    let mut body = DiagnosticsBody {
        backend: "running",
        database: "not available".into(),
        database_url: if database_url_set { "set" } else { "not set" },
        database_name: None,
        connection_status: "not connected",
        collections: Vec::new(),
    };

    if let Err(e) = store.ping().await {
        tracing::warn!(error = %e, "diagnostics: store unreachable");
        body.database = format!("error: {}", truncated(&e));
        return body;
    }
    body.database = "available".into();
    body.connection_status = "connected";
    body.database_name = Some(store.database_name().await.unwrap_or_else(|_| "connected".into()));

    match store.list_collections(DIAGNOSTIC_COLLECTION_LIMIT).await {
        Ok(names) => {
            body.collections = names;
            body.database = "connected & working".into();
        }
        Err(e) => {
            tracing::warn!(error = %e, "diagnostics: listing collections failed");
            body.database = format!("connected but error: {}", truncated(&e));
        }
    }
    body
}

/// GET /test — always 200.
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsBody> {
    Json(diagnose(state.store.as_ref(), state.database_url_set).await)
}
