//! Business rules between the transport-facing service and the store
//!
//! The controller validates required identifiers and reshapes store results
//! into response records. It holds nothing but its store.

use async_trait::async_trait;

use super::errors::{ControllerError, ControllerResult};
use super::types::{
    CreateFileResponse, DeleteRequest, DeleteResponse, SearchRequest, SearchResponse,
    UpdateResponse,
};
use crate::search::{FileRecord, MultiMatchQuery, Store};

/// File operations exposed to the service layer
#[async_trait]
pub trait Controller: Send + Sync {
    async fn create_file(&self, record: FileRecord) -> ControllerResult<CreateFileResponse>;

    async fn search(&self, request: SearchRequest) -> ControllerResult<SearchResponse>;

    async fn update(&self, record: FileRecord) -> ControllerResult<UpdateResponse>;

    async fn delete(&self, request: DeleteRequest) -> ControllerResult<DeleteResponse>;

    async fn health_check(&self) -> ControllerResult<bool>;
}

/// [`Controller`] backed by any [`Store`]
pub struct SearchController<S> {
    store: S,
}

impl<S: Store> SearchController<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: Store> Controller for SearchController<S> {
    async fn create_file(&self, record: FileRecord) -> ControllerResult<CreateFileResponse> {
        let id = self.store.create(record).await?;
        Ok(CreateFileResponse { id })
    }

    async fn search(&self, request: SearchRequest) -> ControllerResult<SearchResponse> {
        let ids = self
            .store
            .get_all(MultiMatchQuery::new(request.term))
            .await?;
        Ok(SearchResponse { ids })
    }

    async fn update(&self, record: FileRecord) -> ControllerResult<UpdateResponse> {
        if record.id.is_empty() {
            return Err(ControllerError::file_id_required());
        }
        let id = self.store.update(record).await?;
        Ok(UpdateResponse { id })
    }

    async fn delete(&self, request: DeleteRequest) -> ControllerResult<DeleteResponse> {
        if request.id.is_empty() {
            return Err(ControllerError::file_id_required());
        }
        let id = self.store.delete(request.id).await?;
        Ok(DeleteResponse { id })
    }

    async fn health_check(&self) -> ControllerResult<bool> {
        Ok(self.store.health_check().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{StoreError, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts calls and answers with canned results
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
        healthy: bool,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Store for CountingStore {
        async fn create(&self, record: FileRecord) -> StoreResult<String> {
            self.hit();
            Ok(record.id)
        }

        async fn get_all(&self, query: MultiMatchQuery) -> StoreResult<Vec<String>> {
            self.hit();
            Ok(vec![format!("match:{}", query.term)])
        }

        async fn update(&self, record: FileRecord) -> StoreResult<String> {
            self.hit();
            Ok(record.id)
        }

        async fn delete(&self, id: String) -> StoreResult<String> {
            self.hit();
            if id == "missing" {
                return Err(StoreError::NotFound(id));
            }
            Ok(id)
        }

        async fn health_check(&self) -> StoreResult<bool> {
            self.hit();
            if self.healthy {
                Ok(true)
            } else {
                Err(StoreError::Task("engine unreachable".into()))
            }
        }
    }

    #[tokio::test]
    async fn test_update_without_id_never_reaches_store() {
        let controller = SearchController::new(CountingStore::default());

        let err = controller
            .update(FileRecord {
                name: "notes.txt".into(),
                ..FileRecord::default()
            })
            .await
            .expect_err("id is required");

        assert!(matches!(err, ControllerError::Validation(_)));
        assert_eq!(err.to_string(), "file id is required");
        assert_eq!(controller.store().calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_without_id_never_reaches_store() {
        let controller = SearchController::new(CountingStore::default());

        let err = controller
            .delete(DeleteRequest { id: String::new() })
            .await
            .expect_err("id is required");

        assert_eq!(err.to_string(), "file id is required");
        assert_eq!(controller.store().calls(), 0);
    }

    #[tokio::test]
    async fn test_search_wraps_store_ids() {
        let controller = SearchController::new(CountingStore::default());

        let response = controller
            .search(SearchRequest {
                term: "invoice".into(),
            })
            .await
            .expect("search");

        assert_eq!(response.ids, vec!["match:invoice".to_string()]);
        assert_eq!(controller.store().calls(), 1);
    }

    #[tokio::test]
    async fn test_store_errors_pass_through_unchanged() {
        let controller = SearchController::new(CountingStore::default());

        let err = controller
            .delete(DeleteRequest {
                id: "missing".into(),
            })
            .await
            .expect_err("store reports not found");

        assert!(matches!(err, ControllerError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_health_check_propagates_engine_errors() {
        let controller = SearchController::new(CountingStore::default());
        assert!(controller.health_check().await.is_err());

        let controller = SearchController::new(CountingStore {
            healthy: true,
            ..CountingStore::default()
        });
        assert!(controller.health_check().await.expect("healthy"));
    }
}
