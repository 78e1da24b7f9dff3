use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of bytes read from a process stream per funnel write.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 8192;

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Spawned commands see the editor's environment unless configured otherwise.
#[must_use]
pub const fn default_inherit_environment() -> bool {
    true
}

/// Default chunk size for process stream copies.
#[must_use]
pub const fn default_stream_chunk_size() -> usize {
    DEFAULT_STREAM_CHUNK_SIZE
}
