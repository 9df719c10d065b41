//! Controller-level errors

use thiserror::Error;

use crate::search::StoreError;

/// Message returned when an update or delete names no file
pub const FILE_ID_REQUIRED: &str = "file id is required";

#[derive(Debug, Error)]
pub enum ControllerError {
    /// Request failed a required-field check; the store was not called
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ControllerError {
    #[must_use]
    pub fn file_id_required() -> Self {
        ControllerError::Validation(FILE_ID_REQUIRED.to_string())
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;
