//! Error types for command dispatch failures.
//!
//! Each variant is terminal only to the command that raised it; the router
//! reports it and keeps accepting commands.

use std::sync::Arc;

use thiserror::Error;

use scribe_edit::{CompileError, RunError};
use scribe_exec::ExecError;

use crate::workbench::WorkbenchError;

/// Errors surfaced while dispatching one command.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The command needs a destination and none was given.
    #[error("no destination for '{command}'")]
    NoDestination {
        /// The command text.
        command: String,
    },

    /// A destination carries no editable buffer.
    #[error("unknown target type: {kind}")]
    UnknownTarget {
        /// Description of the destination.
        kind: String,
    },

    /// The command needs an active tag and none has focus.
    #[error("no active tag for '{command}'")]
    NoActiveTag {
        /// The command text.
        command: String,
    },

    /// The command line contains no words.
    #[error("empty command")]
    EmptyCommand,

    /// An edit script failed to compile.
    #[error("bad edit script '{script}': {source}")]
    Compile {
        /// The script text.
        script: String,
        /// Underlying compile error.
        #[source]
        source: Arc<CompileError>,
    },

    /// An edit script failed against one buffer.
    #[error("edit failed on {target}: {source}")]
    Edit {
        /// Description of the buffer.
        target: String,
        /// Underlying run error.
        #[source]
        source: RunError,
    },

    /// An external command could not be started.
    #[error("'{command}' failed: {source}")]
    Exec {
        /// The command text.
        command: String,
        /// Underlying execution error.
        #[source]
        source: ExecError,
    },

    /// The workbench rejected a built-in or install request.
    #[error("{verb}: {source}")]
    Workbench {
        /// The verb being executed.
        verb: String,
        /// Underlying workbench error.
        #[source]
        source: WorkbenchError,
    },
}

impl DispatchError {
    /// Builds a [`DispatchError::NoDestination`].
    pub fn no_destination(command: impl Into<String>) -> Self {
        Self::NoDestination {
            command: command.into(),
        }
    }

    /// Builds a [`DispatchError::UnknownTarget`].
    pub fn unknown_target(kind: impl Into<String>) -> Self {
        Self::UnknownTarget { kind: kind.into() }
    }

    /// Builds a [`DispatchError::NoActiveTag`].
    pub fn no_active_tag(command: impl Into<String>) -> Self {
        Self::NoActiveTag {
            command: command.into(),
        }
    }

    /// Builds a [`DispatchError::EmptyCommand`].
    #[must_use]
    pub const fn empty_command() -> Self {
        Self::EmptyCommand
    }

    /// Builds a [`DispatchError::Compile`].
    pub fn compile(script: impl Into<String>, source: CompileError) -> Self {
        Self::Compile {
            script: script.into(),
            source: Arc::new(source),
        }
    }

    /// Builds a [`DispatchError::Edit`].
    pub fn edit(target: impl Into<String>, source: RunError) -> Self {
        Self::Edit {
            target: target.into(),
            source,
        }
    }

    /// Builds a [`DispatchError::Exec`], folding an empty command line into
    /// [`DispatchError::EmptyCommand`].
    pub fn exec(command: impl Into<String>, source: ExecError) -> Self {
        match source {
            ExecError::EmptyCommand => Self::EmptyCommand,
            other => Self::Exec {
                command: command.into(),
                source: other,
            },
        }
    }

    /// Builds a [`DispatchError::Workbench`].
    pub fn workbench(verb: impl Into<String>, source: WorkbenchError) -> Self {
        Self::Workbench {
            verb: verb.into(),
            source,
        }
    }

    /// Short machine-readable name of the variant, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoDestination { .. } => "no_destination",
            Self::UnknownTarget { .. } => "unknown_target",
            Self::NoActiveTag { .. } => "no_active_tag",
            Self::EmptyCommand => "empty_command",
            Self::Compile { .. } => "compile",
            Self::Edit { .. } => "edit",
            Self::Exec { .. } => "exec",
            Self::Workbench { .. } => "workbench",
        }
    }
}
