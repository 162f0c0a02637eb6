//! Maps storage port errors onto the boundary error contract.

use crate::domain::Error;
use crate::domain::ports::{EntryRepositoryError, ReviewRepositoryError};
use crate::domain::validation::CatalogValidationError;

pub(super) fn map_entry_repository_error(error: EntryRepositoryError) -> Error {
    match error {
        EntryRepositoryError::Unavailable { message } => {
            Error::store_unavailable(format!("catalog entry store unavailable: {message}"))
        }
        EntryRepositoryError::Query { message } => {
            Error::internal(format!("catalog entry store error: {message}"))
        }
        EntryRepositoryError::SlugTaken { slug } => {
            Error::slug_conflict(format!("slug '{slug}' is already taken"))
        }
        EntryRepositoryError::Missing { id } => {
            Error::not_found(format!("catalog entry {id} not found"))
        }
    }
}

pub(super) fn map_review_repository_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Unavailable { message } => {
            Error::store_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review store error: {message}"))
        }
    }
}

pub(super) fn map_validation_error(error: CatalogValidationError) -> Error {
    Error::validation(error.into_violations())
}
