//! Health state derived from the store and published for probes

pub mod reporter;
pub mod worker;

pub use reporter::{HealthReporter, HealthSink, OVERALL_SERVICE, ServingStatus};
pub use worker::HealthCheckWorker;
