//! Background reaping of started processes.

use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::command::{ExitStatus, Running};
use crate::error::ExecError;

const HANDLE_TARGET: &str = "scribe_exec::handle";

/// Join handle for a process being reaped on its own thread.
#[derive(Debug)]
pub struct ProcessHandle {
    label: String,
    waiter: JoinHandle<Result<ExitStatus, ExecError>>,
}

impl ProcessHandle {
    /// Moves `running` onto a waiter thread.
    ///
    /// `label` names the buffer receiving the process output and is carried
    /// into logs.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Worker`] when the thread cannot be created.
    /// `running` is dropped in that case; an [`OsProcess`](crate::OsProcess)
    /// kills and reaps its child when dropped.
    pub fn spawn(label: impl Into<String>, running: Running) -> Result<Self, ExecError> {
        let buffer_label: String = label.into();
        let name = running.name().to_owned();
        let thread_label = buffer_label.clone();
        let waiter = thread::Builder::new()
            .name(format!("{name}-wait"))
            .spawn(move || {
                let result = running.wait();
                match &result {
                    Ok(status) => info!(
                        target: HANDLE_TARGET,
                        label = %thread_label,
                        %status,
                        "process finished"
                    ),
                    Err(error) => warn!(
                        target: HANDLE_TARGET,
                        label = %thread_label,
                        %error,
                        "process failed"
                    ),
                }
                result
            })
            .map_err(|err| ExecError::worker(&name, err.to_string()))?;
        Ok(Self {
            label: buffer_label,
            waiter,
        })
    }

    /// Label of the result buffer the process writes to.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` once the process has been reaped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.waiter.is_finished()
    }

    /// Blocks until the process has exited and its output is written.
    ///
    /// # Errors
    ///
    /// Returns the process's wait or stream failure, or
    /// [`ExecError::Worker`] if the waiter thread panicked.
    pub fn join(self) -> Result<ExitStatus, ExecError> {
        self.waiter
            .join()
            .map_err(|_| ExecError::worker(&self.label, "waiter thread panicked"))?
    }
}
