//! Resolved service configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::search::StoreOptions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Immutable configuration resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub(crate) port: u16,
    pub(crate) data_dir: PathBuf,
    pub(crate) index_name: String,
    pub(crate) health_check_interval: Duration,
    pub(crate) health_check_timeout: Duration,
    pub(crate) writer_memory_bytes: usize,
    pub(crate) max_results: usize,
}

impl ServiceConfig {
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Listen address on all interfaces
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    #[must_use]
    pub fn health_check_interval(&self) -> Duration {
        self.health_check_interval
    }

    #[must_use]
    pub fn health_check_timeout(&self) -> Duration {
        self.health_check_timeout
    }

    #[must_use]
    pub fn writer_memory_bytes(&self) -> usize {
        self.writer_memory_bytes
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Options for opening the document store
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            data_dir: self.data_dir.clone(),
            writer_memory_bytes: self.writer_memory_bytes,
            max_results: self.max_results,
        }
    }
}
