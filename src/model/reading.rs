use crate::error::AppError;
use crate::service::validation::{require_non_negative, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const READING_COLLECTION: &str = "reading";

/// Meter reading document as persisted in the `reading` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// String form of the customer's id.
    pub customer_id: String,
    pub current_reading: f64,
    pub operator_name: Option<String>,
    pub notes: Option<String>,
    pub reading_date: DateTime<Utc>,
}

/// Body of `POST /api/readings`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateReadingRequest {
    pub customer_id: String,
    pub current_reading: f64,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub reading_date: Option<DateTime<Utc>>,
}

impl Validate for CreateReadingRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_negative("current_reading", self.current_reading)
    }
}

impl CreateReadingRequest {
    /// Builds the record once the customer is known to exist. `customer_id`
    /// is stored exactly as sent; a missing `reading_date` becomes `now`.
    pub fn into_reading(self, now: DateTime<Utc>) -> Reading {
        Reading {
            customer_id: self.customer_id,
            current_reading: self.current_reading,
            operator_name: self.operator_name,
            notes: self.notes,
            reading_date: self.reading_date.unwrap_or(now),
        }
    }
}
