//! Errors raised while preparing, starting or reaping external processes.
//!
//! I/O errors are wrapped in `Arc` to satisfy the `result_large_err` Clippy
//! lint and keep the enum cheap to clone into reports.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from process execution.
#[derive(Debug, Clone, Error)]
pub enum ExecError {
    /// The command line contained no words.
    #[error("empty command")]
    EmptyCommand,

    /// A stream index outside `0..=2` was used.
    #[error("bad file descriptor {fd}")]
    BadFd {
        /// The rejected descriptor.
        fd: usize,
    },

    /// A standard stream was never bound before start.
    #[error("file descriptor {fd} is not bound")]
    NoFd {
        /// The unbound descriptor.
        fd: usize,
    },

    /// A reader was bound to an output descriptor or a writer to stdin.
    #[error("file descriptor {fd} bound in the wrong direction")]
    Direction {
        /// The misbound descriptor.
        fd: usize,
    },

    /// The process was started twice, or redirected after starting.
    #[error("process '{program}' already started")]
    AlreadyStarted {
        /// Program name.
        program: String,
    },

    /// Wait was called on a process that never started.
    #[error("process '{program}' was not started")]
    NotStarted {
        /// Program name.
        program: String,
    },

    /// The program could not be found on the search path.
    #[error("command '{program}' not found")]
    NotFound {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The operating system refused to start the program.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Reaping the child failed.
    #[error("failed to wait for '{program}': {source}")]
    Wait {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Copying one of the standard streams failed.
    #[error("stream {fd} of '{program}' failed: {source}")]
    Stream {
        /// Program name.
        program: String,
        /// Descriptor being copied.
        fd: usize,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A helper thread could not be created or panicked.
    #[error("worker thread for '{program}' failed: {message}")]
    Worker {
        /// Program name.
        program: String,
        /// Description of the failure.
        message: String,
    },
}

impl ExecError {
    /// Classifies a spawn failure, distinguishing missing programs.
    pub(crate) fn spawn(program: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_owned(),
                source: Arc::new(source),
            }
        } else {
            Self::Spawn {
                program: program.to_owned(),
                source: Arc::new(source),
            }
        }
    }

    pub(crate) fn stream(program: &str, fd: usize, source: io::Error) -> Self {
        Self::Stream {
            program: program.to_owned(),
            fd,
            source: Arc::new(source),
        }
    }

    pub(crate) fn worker(program: &str, message: impl Into<String>) -> Self {
        Self::Worker {
            program: program.to_owned(),
            message: message.into(),
        }
    }
}
