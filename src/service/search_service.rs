//! Transport-facing facade over a [`Controller`]

use std::sync::Arc;
use std::time::Duration;

use super::controller::Controller;
use super::errors::ControllerResult;
use super::types::{
    CreateFileResponse, DeleteRequest, DeleteResponse, SearchRequest, SearchResponse,
    UpdateResponse,
};
use crate::search::FileRecord;
use crate::utils::DEFAULT_HEALTH_CHECK_TIMEOUT_SECS;

/// One method per exposed operation, each delegating to the controller
///
/// Only [`health_check`](Self::health_check) adds behavior: it bounds the
/// controller call with a timeout and reduces every failure to `false`.
#[derive(Clone)]
pub struct SearchService {
    controller: Arc<dyn Controller>,
    health_check_timeout: Duration,
}

impl SearchService {
    #[must_use]
    pub fn new(controller: Arc<dyn Controller>) -> Self {
        Self {
            controller,
            health_check_timeout: Duration::from_secs(DEFAULT_HEALTH_CHECK_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_health_check_timeout(mut self, timeout: Duration) -> Self {
        self.health_check_timeout = timeout;
        self
    }

    pub async fn create_file(&self, record: FileRecord) -> ControllerResult<CreateFileResponse> {
        self.controller.create_file(record).await
    }

    pub async fn search(&self, request: SearchRequest) -> ControllerResult<SearchResponse> {
        self.controller.search(request).await
    }

    pub async fn update(&self, record: FileRecord) -> ControllerResult<UpdateResponse> {
        self.controller.update(record).await
    }

    pub async fn delete(&self, request: DeleteRequest) -> ControllerResult<DeleteResponse> {
        self.controller.delete(request).await
    }

    /// Whether the backing store is healthy; never fails
    pub async fn health_check(&self) -> bool {
        match tokio::time::timeout(self.health_check_timeout, self.controller.health_check()).await
        {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Health check failed");
                false
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.health_check_timeout.as_millis(),
                    "Health check timed out"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::errors::ControllerError;
    use async_trait::async_trait;

    /// Controller whose health check answers after a fixed delay
    struct SlowController {
        delay: Duration,
        result: fn() -> ControllerResult<bool>,
    }

    #[async_trait]
    impl Controller for SlowController {
        async fn create_file(&self, record: FileRecord) -> ControllerResult<CreateFileResponse> {
            Ok(CreateFileResponse { id: record.id })
        }

        async fn search(&self, _request: SearchRequest) -> ControllerResult<SearchResponse> {
            Ok(SearchResponse::default())
        }

        async fn update(&self, record: FileRecord) -> ControllerResult<UpdateResponse> {
            Ok(UpdateResponse { id: record.id })
        }

        async fn delete(&self, request: DeleteRequest) -> ControllerResult<DeleteResponse> {
            Ok(DeleteResponse { id: request.id })
        }

        async fn health_check(&self) -> ControllerResult<bool> {
            tokio::time::sleep(self.delay).await;
            (self.result)()
        }
    }

    fn service(delay: Duration, result: fn() -> ControllerResult<bool>) -> SearchService {
        SearchService::new(Arc::new(SlowController { delay, result }))
            .with_health_check_timeout(Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_slow_health_check_times_out_as_unhealthy() {
        let service = service(Duration::from_secs(5), || Ok(true));
        assert!(!service.health_check().await);
    }

    #[tokio::test]
    async fn test_prompt_health_check_reports_result() {
        let service = service(Duration::from_millis(1), || Ok(true));
        assert!(service.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_errors_collapse_to_false() {
        let service = service(Duration::ZERO, || {
            Err(ControllerError::Validation("engine down".into()))
        });
        assert!(!service.health_check().await);
    }

    #[tokio::test]
    async fn test_operations_delegate_unchanged() {
        let service = service(Duration::ZERO, || Ok(true));
        let response = service
            .delete(DeleteRequest { id: "f9".into() })
            .await
            .expect("delete");
        assert_eq!(response.id, "f9");
    }
}
