//! The document store boundary
//!
//! [`Store`] is the only seam through which the controller reaches the
//! index. [`TantivyStore`](super::engine::TantivyStore) is the production
//! implementation; tests substitute in-memory fakes.

use async_trait::async_trait;

use super::errors::StoreResult;
use super::query::MultiMatchQuery;
use super::types::FileRecord;

/// Document store operations in terms of file records
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Index `record`, returning the document key it was stored under
    ///
    /// The key is the record's `id` when set, otherwise engine-assigned.
    /// An existing document with the same key is replaced.
    async fn create(&self, record: FileRecord) -> StoreResult<String>;

    /// Keys of documents matching `query`, in engine order
    async fn get_all(&self, query: MultiMatchQuery) -> StoreResult<Vec<String>>;

    /// Merge the set fields of `record` into the document keyed by its `id`
    async fn update(&self, record: FileRecord) -> StoreResult<String>;

    /// Remove the document keyed by `id`
    async fn delete(&self, id: String) -> StoreResult<String>;

    /// True when the engine is reachable and the index still exists
    async fn health_check(&self) -> StoreResult<bool>;
}
