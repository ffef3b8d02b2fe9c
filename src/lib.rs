//! Meter reading API: customers and water-meter readings over a document store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod model;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use id::DocumentId;
pub use model::{Customer, Reading, Stored, CUSTOMER_COLLECTION, READING_COLLECTION};
pub use routes::{api_routes, app, common_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, DocumentStore, MemoryDocumentStore, PgDocumentStore};
