//! Configuration for the file search service
//!
//! `ServiceConfig` is resolved once, from defaults and `SS_*` environment
//! variables, before any store or service is constructed.

pub mod builder;
pub mod env;
pub mod types;

pub use builder::ServiceConfigBuilder;
pub use types::{ConfigError, ServiceConfig};
