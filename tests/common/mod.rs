//! Shared helpers for the integration test suite

use std::sync::Arc;

use file_search_service::search::StoreOptions;
use file_search_service::{SearchController, SearchService, TantivyStore};
use tempfile::TempDir;

#[allow(dead_code)]
pub const INDEX_NAME: &str = "files";

/// Open the test index under `dir`
#[allow(dead_code)]
pub fn open_store(dir: &TempDir) -> TantivyStore {
    TantivyStore::initialize(StoreOptions::new(dir.path()), INDEX_NAME)
        .expect("store should initialize")
}

/// Full service stack over a fresh store, plus the store handle itself
pub fn service_stack(dir: &TempDir) -> (SearchService, TantivyStore) {
    let store = open_store(dir);
    let controller = Arc::new(SearchController::new(store.clone()));
    (SearchService::new(controller), store)
}
