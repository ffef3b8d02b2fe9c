//! Per-field request validation beyond what deserialization already enforces.

use crate::error::AppError;

/// Field-level checks on a deserialized request body. Presence and type of
/// required fields are enforced by serde before this runs.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!("{} must be a finite number", field)));
    }
    if value < 0.0 {
        return Err(AppError::Validation(format!("{} must be at least 0", field)));
    }
    Ok(())
}
