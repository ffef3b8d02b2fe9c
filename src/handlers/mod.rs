//! HTTP handlers: health and diagnostics, customers, readings.

pub mod customers;
pub mod health;
pub mod readings;
pub use customers::*;
pub use health::*;
pub use readings::*;
