//! Customer handlers: create, list with filters, lookup by QR value.

use crate::error::AppError;
use crate::extractors::{QueryParams, ValidatedJson};
use crate::model::{CreateCustomerRequest, Customer, Stored, CUSTOMER_COLLECTION};
use crate::query::{qr_filter, CustomerQuery};
use crate::response::{created_id, success_many, success_optional};
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::{Path, State};

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCustomerRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let customer = Customer::from(body);
    let id = CrudService::create(state.store.as_ref(), CUSTOMER_COLLECTION, &customer).await?;
    Ok(created_id(id))
}

/// GET /api/customers?q=&meter=
pub async fn list_customers(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CustomerQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows: Vec<Stored<Customer>> =
        CrudService::find(state.store.as_ref(), CUSTOMER_COLLECTION, &query.to_filter(), None).await?;
    Ok(success_many(rows))
}

/// GET /api/customers/by-qr/:qr — `null` when no customer carries that QR value.
pub async fn customer_by_qr(
    State(state): State<AppState>,
    Path(qr): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let row: Option<Stored<Customer>> =
        CrudService::find_one(state.store.as_ref(), CUSTOMER_COLLECTION, &qr_filter(&qr)).await?;
    Ok(success_optional(row))
}
