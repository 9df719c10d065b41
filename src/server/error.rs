//! Mapping of controller errors onto HTTP responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::search::StoreError;
use crate::service::ControllerError;

/// Error body returned by every RPC route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Controller error on its way out through the transport
#[derive(Debug)]
pub struct ApiError(pub ControllerError);

impl From<ControllerError> for ApiError {
    fn from(error: ControllerError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ControllerError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            ControllerError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ControllerError::Store(StoreError::InvalidDocument { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
            }
            ControllerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request rejected");
        }

        let body = ErrorBody {
            code: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_error_kinds_to_status() {
        let cases = [
            (ControllerError::file_id_required(), StatusCode::BAD_REQUEST),
            (
                ControllerError::Store(StoreError::NotFound("f1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ControllerError::Store(StoreError::Task("cancelled".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).into_response().status(), expected);
        }
    }
}
