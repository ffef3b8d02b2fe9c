//! Shared application state for all routes.

use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Whether a `DATABASE_URL` was supplied; reported by diagnostics.
    pub database_url_set: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, database_url_set: bool) -> Self {
        AppState {
            store,
            database_url_set,
        }
    }
}
