//! Periodic health-check loop
//!
//! Every interval the worker asks the service whether it is healthy and
//! publishes the answer to the sink, whether or not it changed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::reporter::{HealthSink, OVERALL_SERVICE, ServingStatus};
use crate::service::SearchService;
use crate::utils::DEFAULT_HEALTH_CHECK_INTERVAL_SECS;

pub struct HealthCheckWorker {
    service: SearchService,
    sink: Arc<dyn HealthSink>,
    interval: Duration,
}

impl HealthCheckWorker {
    /// Worker publishing under [`OVERALL_SERVICE`]
    #[must_use]
    pub fn new(service: SearchService, sink: Arc<dyn HealthSink>) -> Self {
        Self {
            service,
            sink,
            interval: Duration::from_secs(DEFAULT_HEALTH_CHECK_INTERVAL_SECS),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one check and publish its result
    pub async fn tick(&self) -> ServingStatus {
        let status = ServingStatus::from_healthy(self.service.health_check().await);
        self.sink.set_serving_status(OVERALL_SERVICE, status);
        status
    }

    /// Poll forever; the first check runs immediately
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.interval.as_millis(),
            "Health check loop started"
        );

        let mut last = ServingStatus::Unknown;
        loop {
            ticker.tick().await;
            let status = self.tick().await;
            if status != last {
                tracing::info!(from = %last, to = %status, "Serving status changed");
                last = status;
            } else {
                tracing::debug!(status = %status, "Serving status unchanged");
            }
        }
    }

    /// Spawn [`run`](Self::run) on the runtime; abort the handle to stop it
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
