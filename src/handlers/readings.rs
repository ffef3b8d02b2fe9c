//! Reading handlers: create (after checking the customer exists) and list.

use crate::error::AppError;
use crate::extractors::{QueryParams, ValidatedJson};
use crate::id::DocumentId;
use crate::model::{CreateReadingRequest, Reading, Stored, CUSTOMER_COLLECTION, READING_COLLECTION};
use crate::query::ReadingQuery;
use crate::response::{created_id, success_many};
use crate::service::CrudService;
use crate::state::AppState;
use axum::extract::State;

/// POST /api/readings
///
/// The customer check and the insert are separate store operations; a customer
/// removed in between still gets the reading.
pub async fn create_reading(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateReadingRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let customer_id: DocumentId = body
        .customer_id
        .parse()
        .map_err(|_| AppError::BadRequest("invalid customer_id".into()))?;
    if !CrudService::exists(state.store.as_ref(), CUSTOMER_COLLECTION, &customer_id).await? {
        return Err(AppError::NotFound("customer not found".into()));
    }
    let reading = body.into_reading(chrono::Utc::now());
    let id = CrudService::create(state.store.as_ref(), READING_COLLECTION, &reading).await?;
    Ok(created_id(id))
}

/// GET /api/readings?customer_id=&limit=
pub async fn list_readings(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ReadingQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows: Vec<Stored<Reading>> = CrudService::find(
        state.store.as_ref(),
        READING_COLLECTION,
        &query.to_filter(),
        Some(query.limit()),
    )
    .await?;
    Ok(success_many(rows))
}
