//! CrudService: typed create/find over a document store.

mod crud;
pub mod validation;
pub use crud::CrudService;
pub use validation::Validate;
