pub mod catalog_service;
pub mod delete_service;

pub use catalog_service::{CatalogCounts, CatalogError, Created, ValidationError};
pub use delete_service::{
    confirm_delete, prepare_delete, DeleteConfirmation, DeleteError, DeleteOutcome, PrepareOutcome,
};
