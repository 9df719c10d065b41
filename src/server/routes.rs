//! RPC-style JSON routes over [`SearchService`]

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::health::{HealthReporter, OVERALL_SERVICE, ServingStatus};
use crate::search::FileRecord;
use crate::service::{
    CreateFileResponse, DeleteRequest, DeleteResponse, SearchRequest, SearchResponse,
    SearchService, UpdateResponse,
};
use crate::utils::MAX_REQUEST_BODY_BYTES;

pub const CREATE_FILE_PATH: &str = "/search.Search/CreateFile";
pub const SEARCH_PATH: &str = "/search.Search/Search";
pub const UPDATE_PATH: &str = "/search.Search/Update";
pub const DELETE_PATH: &str = "/search.Search/Delete";
pub const HEALTH_PATH: &str = "/health";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: SearchService,
    pub health: Arc<HealthReporter>,
}

impl AppState {
    #[must_use]
    pub fn new(service: SearchService, health: Arc<HealthReporter>) -> Self {
        Self { service, health }
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: ServingStatus,
}

/// Build the application router
///
/// Request tracing covers the RPC routes only, so frequent probes of the
/// health route do not flood the log.
pub fn router(state: AppState) -> Router {
    let rpc = Router::new()
        .route(CREATE_FILE_PATH, post(create_file))
        .route(SEARCH_PATH, post(search))
        .route(UPDATE_PATH, post(update))
        .route(DELETE_PATH, post(delete))
        .layer(TraceLayer::new_for_http());

    rpc.route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

async fn create_file(
    State(state): State<AppState>,
    Json(record): Json<FileRecord>,
) -> Result<Json<CreateFileResponse>, ApiError> {
    Ok(Json(state.service.create_file(record).await?))
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    Ok(Json(state.service.search(request).await?))
}

async fn update(
    State(state): State<AppState>,
    Json(record): Json<FileRecord>,
) -> Result<Json<UpdateResponse>, ApiError> {
    Ok(Json(state.service.update(record).await?))
}

async fn delete(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    Ok(Json(state.service.delete(request).await?))
}

/// GET /health - latest status published by the health loop
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.health.status(OVERALL_SERVICE);
    let code = if status.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(HealthBody { status }))
}
