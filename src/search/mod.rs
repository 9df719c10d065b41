//! File-metadata indexing on top of Tantivy
//!
//! This module owns everything that touches the index: the schema and its
//! analyzers, query translation, and the [`Store`] boundary with its
//! Tantivy-backed implementation.

pub mod analyzers;
pub mod engine;
pub mod errors;
pub mod query;
pub mod schema;
pub mod store;
pub mod types;

pub use engine::{StoreOptions, TantivyStore};
pub use errors::{InitError, StoreError, StoreResult};
pub use query::MultiMatchQuery;
pub use schema::{IndexSchema, SchemaError};
pub use store::Store;
pub use types::FileRecord;
