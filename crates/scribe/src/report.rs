//! Structured reporting of lifecycle and command events.

use std::sync::Arc;

use scribe_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::{BuiltinVerb, DispatchError};

const REPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::report");

/// Observer surfacing editor events to telemetry sinks.
///
/// Every command failure reaches [`Reporter::command_failed`] exactly once;
/// the router never propagates it further.
pub trait Reporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked when a command is received, before routing.
    fn command_received(&self, text: &str);

    /// Invoked after a built-in verb completes.
    fn builtin_completed(&self, verb: BuiltinVerb);

    /// Invoked after an edit script has been applied to a destination.
    fn edit_completed(&self, target: &str, failures: usize);

    /// Invoked once an external process is running.
    fn process_started(&self, label: &str, argv: &[String]);

    /// Invoked for every error terminating a command or a fan-out member.
    fn command_failed(&self, command: &str, error: &DispatchError);
}

impl<T> Reporter for Arc<T>
where
    T: Reporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn command_received(&self, text: &str) {
        (**self).command_received(text);
    }

    fn builtin_completed(&self, verb: BuiltinVerb) {
        (**self).builtin_completed(verb);
    }

    fn edit_completed(&self, target: &str, failures: usize) {
        (**self).edit_completed(target, failures);
    }

    fn process_started(&self, label: &str, argv: &[String]) {
        (**self).process_started(label, argv);
    }

    fn command_failed(&self, command: &str, error: &DispatchError) {
        (**self).command_failed(command, error);
    }
}

/// Default reporter that records events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReporter;

impl StructuredReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reporter for StructuredReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "bootstrap_starting",
            "starting editor bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "bootstrap_succeeded",
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            inherit_environment = config.inherit_environment(),
            stream_chunk_size = config.stream_chunk_size(),
            "editor bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: REPORT_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "editor bootstrap failed"
        );
    }

    fn command_received(&self, text: &str) {
        tracing::debug!(
            target: REPORT_TARGET,
            event = "command_received",
            command = text,
            "command received"
        );
    }

    fn builtin_completed(&self, verb: BuiltinVerb) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "builtin_completed",
            verb = %verb,
            "built-in completed"
        );
    }

    fn edit_completed(&self, target: &str, failures: usize) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "edit_completed",
            destination = target,
            failures,
            "edit script applied"
        );
    }

    fn process_started(&self, label: &str, argv: &[String]) {
        tracing::info!(
            target: REPORT_TARGET,
            event = "process_started",
            label,
            argv = ?argv,
            "external command started"
        );
    }

    fn command_failed(&self, command: &str, error: &DispatchError) {
        tracing::warn!(
            target: REPORT_TARGET,
            event = "command_failed",
            command,
            kind = error.kind(),
            error = %error,
            "command failed"
        );
    }
}
