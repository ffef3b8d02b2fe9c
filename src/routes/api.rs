//! Customer and reading routes, nested under `/api`.

use crate::handlers::{create_customer, create_reading, customer_by_qr, list_customers, list_readings};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/by-qr/:qr", get(customer_by_qr))
        .route("/readings", get(list_readings).post(create_reading))
        .with_state(state)
}
