//! Environment variable source (`SS_*`)

use std::time::Duration;

use tracing::debug;

use super::builder::ServiceConfigBuilder;
use super::types::{ConfigError, ServiceConfig};
use crate::utils::ENV_PREFIX;

pub const PORT_KEY: &str = "PORT";
pub const DATA_DIR_KEY: &str = "DATA_DIR";
pub const INDEX_KEY: &str = "INDEX";
pub const HEALTH_CHECK_INTERVAL_KEY: &str = "HEALTH_CHECK_INTERVAL";
pub const HEALTH_CHECK_TIMEOUT_KEY: &str = "HEALTH_CHECK_TIMEOUT";
pub const WRITER_MEMORY_KEY: &str = "WRITER_MEMORY";
pub const MAX_RESULTS_KEY: &str = "MAX_RESULTS";

fn env_name(key: &str) -> String {
    format!("{ENV_PREFIX}_{key}")
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(&env_name(key)).filter(|s| !s.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, kind: &str) -> Result<Option<T>, ConfigError> {
        match self.var(key) {
            Some(v) => v.trim().parse().map(Some).map_err(|_| {
                ConfigError::invalid(&env_name(key), format!("invalid {kind} value '{v}'"))
            }),
            None => Ok(None),
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup
    ///
    /// Unset and empty variables keep their defaults; unparsable numbers are
    /// errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = EnvReader { lookup };
        let mut builder = ServiceConfigBuilder::default();

        if let Some(port) = env.parsed::<u16>(PORT_KEY, "u16")? {
            builder = builder.port(port);
        }
        if let Some(dir) = env.var(DATA_DIR_KEY) {
            builder = builder.data_dir(dir);
        }
        if let Some(index) = env.var(INDEX_KEY) {
            builder = builder.index_name(index);
        }
        if let Some(secs) = env.parsed::<u64>(HEALTH_CHECK_INTERVAL_KEY, "u64")? {
            builder = builder.health_check_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = env.parsed::<u64>(HEALTH_CHECK_TIMEOUT_KEY, "u64")? {
            builder = builder.health_check_timeout(Duration::from_secs(secs));
        }
        if let Some(bytes) = env.parsed::<usize>(WRITER_MEMORY_KEY, "usize")? {
            builder = builder.writer_memory_bytes(bytes);
        }
        if let Some(max) = env.parsed::<usize>(MAX_RESULTS_KEY, "usize")? {
            builder = builder.max_results(max);
        }

        let config = builder.build()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}
