//! Shared defaults for the file search service
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Environment variable prefix for every service setting (`SS_PORT`, `SS_INDEX`, ...)
pub const ENV_PREFIX: &str = "SS";

/// Default TCP port for the HTTP transport
pub const DEFAULT_PORT: u16 = 8080;

/// Default directory holding one sub-directory per index
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default index name
pub const DEFAULT_INDEX_NAME: &str = "files";

/// Health check poll interval: 3 seconds
///
/// Orchestrators typically probe every 5-10 seconds, so the published state
/// is never more than one probe stale.
pub const DEFAULT_HEALTH_CHECK_INTERVAL_SECS: u64 = 3;

/// Upper bound for a single health check round trip: 1 minute
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 60;

/// Index writer memory budget: 50MB
pub const DEFAULT_WRITER_MEMORY_BYTES: usize = 50_000_000;

/// Smallest writer budget Tantivy accepts for a single indexing thread
pub const MIN_WRITER_MEMORY_BYTES: usize = 15_000_000;

/// Maximum identifiers returned by a search, matching the usual engine page size
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Maximum accepted request body: 16MiB
pub const MAX_REQUEST_BODY_BYTES: usize = 16 << 20;

/// Keyword sub-fields skip values longer than this many characters
pub const KEYWORD_IGNORE_ABOVE: usize = 256;

/// Edge n-gram bounds for the autocomplete filter
pub const AUTOCOMPLETE_MIN_GRAM: usize = 1;
pub const AUTOCOMPLETE_MAX_GRAM: usize = 20;

/// Longest accepted document key, in bytes
pub const MAX_DOCUMENT_KEY_BYTES: usize = 512;
