//! Shared configuration for the scribe editor core.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then a
//! TOML file, then `SCRIBE_*` environment variables, then command-line flags.
//! The resolved [`Config`] controls telemetry output and how external commands
//! are spawned and streamed back into result buffers.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_STREAM_CHUNK_SIZE, default_inherit_environment,
    default_log_filter, default_log_filter_string, default_log_format, default_stream_chunk_size,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the editor binary and its libraries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SCRIBE")]
pub struct Config {
    /// Tracing filter expression, e.g. `info` or `scribe::dispatch=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for telemetry written to stderr.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Whether spawned commands inherit the editor's environment.
    #[ortho_config(default = default_inherit_environment())]
    pub inherit_environment: bool,
    /// Maximum number of bytes delivered per funnel write.
    #[ortho_config(default = default_stream_chunk_size())]
    pub stream_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            inherit_environment: default_inherit_environment(),
            stream_chunk_size: default_stream_chunk_size(),
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Telemetry output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Whether spawned commands inherit the editor's environment.
    #[must_use]
    pub const fn inherit_environment(&self) -> bool {
        self.inherit_environment
    }

    /// Bytes read per funnel write. Zero is treated as one.
    #[must_use]
    pub const fn stream_chunk_size(&self) -> usize {
        if self.stream_chunk_size == 0 {
            1
        } else {
            self.stream_chunk_size
        }
    }
}
