//! Fluent builder for `ServiceConfig`
//!
//! Every setting has a default, so `build` only validates ranges.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{ConfigError, ServiceConfig};
use crate::utils::{
    DEFAULT_DATA_DIR, DEFAULT_HEALTH_CHECK_INTERVAL_SECS, DEFAULT_HEALTH_CHECK_TIMEOUT_SECS,
    DEFAULT_INDEX_NAME, DEFAULT_MAX_RESULTS, DEFAULT_PORT, DEFAULT_WRITER_MEMORY_BYTES,
    MIN_WRITER_MEMORY_BYTES,
};

#[derive(Debug, Clone)]
pub struct ServiceConfigBuilder {
    port: u16,
    data_dir: PathBuf,
    index_name: String,
    health_check_interval: Duration,
    health_check_timeout: Duration,
    writer_memory_bytes: usize,
    max_results: usize,
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            health_check_interval: Duration::from_secs(DEFAULT_HEALTH_CHECK_INTERVAL_SECS),
            health_check_timeout: Duration::from_secs(DEFAULT_HEALTH_CHECK_TIMEOUT_SECS),
            writer_memory_bytes: DEFAULT_WRITER_MEMORY_BYTES,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ServiceConfig {
    /// Create a builder preloaded with defaults
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }
}

impl ServiceConfigBuilder {
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    #[must_use]
    pub fn health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    #[must_use]
    pub fn health_check_timeout(mut self, timeout: Duration) -> Self {
        self.health_check_timeout = timeout;
        self
    }

    #[must_use]
    pub fn writer_memory_bytes(mut self, bytes: usize) -> Self {
        self.writer_memory_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        if self.index_name.is_empty() {
            return Err(ConfigError::invalid("index_name", "must not be empty"));
        }
        if self.health_check_interval < Duration::from_secs(1) {
            return Err(ConfigError::invalid(
                "health_check_interval",
                "must be at least 1 second",
            ));
        }
        if self.health_check_timeout < Duration::from_secs(1) {
            return Err(ConfigError::invalid(
                "health_check_timeout",
                "must be at least 1 second",
            ));
        }
        if self.writer_memory_bytes < MIN_WRITER_MEMORY_BYTES {
            return Err(ConfigError::invalid(
                "writer_memory_bytes",
                format!("must be at least {MIN_WRITER_MEMORY_BYTES} bytes"),
            ));
        }
        if self.max_results == 0 {
            return Err(ConfigError::invalid("max_results", "must be at least 1"));
        }

        Ok(ServiceConfig {
            port: self.port,
            data_dir: self.data_dir,
            index_name: self.index_name,
            health_check_interval: self.health_check_interval,
            health_check_timeout: self.health_check_timeout,
            writer_memory_bytes: self.writer_memory_bytes,
            max_results: self.max_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = ServiceConfig::builder().build().expect("defaults are valid");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.index_name(), "files");
        assert_eq!(config.health_check_interval(), Duration::from_secs(3));
        assert_eq!(config.health_check_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_results(), 10);
    }

    #[test]
    fn test_rejects_sub_second_interval() {
        let err = ServiceConfig::builder()
            .health_check_interval(Duration::from_millis(500))
            .build()
            .expect_err("interval too short");
        assert!(err.to_string().contains("health_check_interval"));
    }

    #[test]
    fn test_rejects_small_writer_budget() {
        assert!(
            ServiceConfig::builder()
                .writer_memory_bytes(1_000_000)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_store_options_carry_settings() {
        let config = ServiceConfig::builder()
            .data_dir("/var/lib/files")
            .max_results(25)
            .build()
            .expect("valid");
        let options = config.store_options();
        assert_eq!(options.data_dir, PathBuf::from("/var/lib/files"));
        assert_eq!(options.max_results, 25);
    }
}
