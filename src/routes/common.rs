//! Common routes: liveness and diagnostics.

use crate::handlers::{diagnostics, root};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET / and GET /test.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(diagnostics))
        .with_state(state)
}
