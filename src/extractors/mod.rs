//! Request extractors that reject with `AppError` so every error shares one body shape.

pub mod validated;
pub use validated::{QueryParams, ValidatedJson};
