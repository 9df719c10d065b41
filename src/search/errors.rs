//! Error types for the document store
//!
//! `InitError` covers bootstrap of the index (directory, existence check,
//! creation, schema compatibility). `StoreError` covers the per-request
//! operations once the index is open.

use std::path::PathBuf;
use tantivy::TantivyError;
use tantivy::directory::error::{OpenDirectoryError, OpenReadError};
use thiserror::Error;

use super::schema::SchemaError;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the requested key
    #[error("document not found: {0}")]
    NotFound(String),

    /// Record cannot be stored as given
    #[error("invalid document {key}: {message}")]
    InvalidDocument { key: String, message: String },

    /// Query text analyzer is not registered with the index
    #[error("analyzer '{0}' is not registered")]
    MissingAnalyzer(String),

    /// Blocking index task panicked or was cancelled
    #[error("index task failed: {0}")]
    Task(String),

    /// Tantivy error wrapper
    #[error("index error: {0}")]
    Engine(#[from] TantivyError),

    #[error("index directory error: {0}")]
    Directory(#[from] OpenDirectoryError),

    #[error("index metadata error: {0}")]
    Read(#[from] OpenReadError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(error: tokio::task::JoinError) -> Self {
        StoreError::Task(error.to_string())
    }
}

/// Errors raised while bootstrapping the index
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid index name '{0}'")]
    InvalidIndexName(String),

    #[error("failed to prepare index directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to check whether index exists at {path:?}: {message}")]
    ExistenceCheck { path: PathBuf, message: String },

    #[error("failed to create index at {path:?}: {source}")]
    Creation {
        path: PathBuf,
        #[source]
        source: TantivyError,
    },

    #[error("failed to open index at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: TantivyError,
    },

    /// Existing index was built with different field mappings
    #[error("index at {path:?} has incompatible mappings: {source}")]
    SchemaMismatch {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("failed to create index reader: {0}")]
    Reader(#[source] TantivyError),

    #[error("failed to create index writer: {0}")]
    Writer(#[source] TantivyError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
