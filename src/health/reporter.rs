//! Serving-status sink read by the health endpoint

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;

/// Health protocol serving state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingStatus {
    /// Nothing has been published yet
    Unknown,
    Serving,
    NotServing,
}

impl ServingStatus {
    #[must_use]
    pub fn from_healthy(healthy: bool) -> Self {
        if healthy {
            ServingStatus::Serving
        } else {
            ServingStatus::NotServing
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ServingStatus::Unknown => "UNKNOWN",
            ServingStatus::Serving => "SERVING",
            ServingStatus::NotServing => "NOT_SERVING",
        }
    }

    #[must_use]
    pub fn is_serving(&self) -> bool {
        matches!(self, ServingStatus::Serving)
    }
}

impl fmt::Display for ServingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service name covering the whole server, as in the gRPC health protocol
pub const OVERALL_SERVICE: &str = "";

/// Settable serving state keyed by service name
pub trait HealthSink: Send + Sync {
    fn set_serving_status(&self, service: &str, status: ServingStatus);
}

/// In-process health registry
///
/// Each service name gets a watch channel, so readers can either poll the
/// latest status or await changes.
#[derive(Default)]
pub struct HealthReporter {
    statuses: RwLock<HashMap<String, watch::Sender<ServingStatus>>>,
}

impl HealthReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest status published for `service`
    #[must_use]
    pub fn status(&self, service: &str) -> ServingStatus {
        self.statuses
            .read()
            .get(service)
            .map_or(ServingStatus::Unknown, |sender| *sender.borrow())
    }

    /// Receiver that observes every status published for `service`
    #[must_use]
    pub fn subscribe(&self, service: &str) -> watch::Receiver<ServingStatus> {
        if let Some(sender) = self.statuses.read().get(service) {
            return sender.subscribe();
        }
        self.statuses
            .write()
            .entry(service.to_string())
            .or_insert_with(|| watch::channel(ServingStatus::Unknown).0)
            .subscribe()
    }
}

impl HealthSink for HealthReporter {
    fn set_serving_status(&self, service: &str, status: ServingStatus) {
        let mut statuses = self.statuses.write();
        let sender = statuses
            .entry(service.to_string())
            .or_insert_with(|| watch::channel(ServingStatus::Unknown).0);
        sender.send_replace(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_until_first_publish() {
        let reporter = HealthReporter::new();
        assert_eq!(reporter.status(""), ServingStatus::Unknown);

        reporter.set_serving_status("", ServingStatus::Serving);
        assert_eq!(reporter.status(""), ServingStatus::Serving);
        assert_eq!(reporter.status("other"), ServingStatus::Unknown);
    }

    #[tokio::test]
    async fn test_subscribers_see_later_publishes() {
        let reporter = HealthReporter::new();
        let mut rx = reporter.subscribe("");

        reporter.set_serving_status("", ServingStatus::NotServing);
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), ServingStatus::NotServing);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ServingStatus::NotServing.to_string(), "NOT_SERVING");
        assert_eq!(
            serde_json::to_string(&ServingStatus::Serving).expect("serializes"),
            "\"SERVING\""
        );
    }
}
