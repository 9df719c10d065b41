//! Service and controller layers
//!
//! Requests flow transport → [`SearchService`] → [`Controller`] → store.

pub mod controller;
pub mod errors;
pub mod search_service;
pub mod types;

pub use controller::{Controller, SearchController};
pub use errors::{ControllerError, ControllerResult, FILE_ID_REQUIRED};
pub use search_service::SearchService;
pub use types::{
    CreateFileResponse, DeleteRequest, DeleteResponse, SearchRequest, SearchResponse,
    UpdateResponse,
};
