//! File-metadata search service
//!
//! Layers, leaves first: [`search`] (schema, analyzers, Tantivy store),
//! [`service`] (controller and transport-facing service), [`health`]
//! (serving-status loop) and [`server`] (HTTP routes).

pub mod config;
pub mod health;
pub mod search;
pub mod server;
pub mod service;
pub mod utils;

pub use config::{ConfigError, ServiceConfig};
pub use health::{HealthCheckWorker, HealthReporter, HealthSink, OVERALL_SERVICE, ServingStatus};
pub use search::{FileRecord, InitError, MultiMatchQuery, Store, StoreError, TantivyStore};
pub use service::{Controller, ControllerError, SearchController, SearchService};
