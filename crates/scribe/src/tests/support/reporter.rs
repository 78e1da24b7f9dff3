//! [`Reporter`] double that records events for assertions.

use std::sync::Mutex;

use scribe_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::{BuiltinVerb, DispatchError};
use crate::report::Reporter;

/// Events captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReportEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    CommandReceived(String),
    BuiltinCompleted(BuiltinVerb),
    EditCompleted { target: String, failures: usize },
    ProcessStarted { label: String },
    CommandFailed { command: String, kind: &'static str },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().expect("reporter mutex poisoned").clone()
    }

    /// Error kinds reported through `command_failed`, in order.
    pub(crate) fn failures(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::CommandFailed { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ReportEvent) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
    }
}

impl Reporter for RecordingReporter {
    fn bootstrap_starting(&self) {
        self.record(ReportEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(ReportEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(ReportEvent::BootstrapFailed(error.to_string()));
    }

    fn command_received(&self, text: &str) {
        self.record(ReportEvent::CommandReceived(text.to_owned()));
    }

    fn builtin_completed(&self, verb: BuiltinVerb) {
        self.record(ReportEvent::BuiltinCompleted(verb));
    }

    fn edit_completed(&self, target: &str, failures: usize) {
        self.record(ReportEvent::EditCompleted {
            target: target.to_owned(),
            failures,
        });
    }

    fn process_started(&self, label: &str, _argv: &[String]) {
        self.record(ReportEvent::ProcessStarted {
            label: label.to_owned(),
        });
    }

    fn command_failed(&self, command: &str, error: &DispatchError) {
        self.record(ReportEvent::CommandFailed {
            command: command.to_owned(),
            kind: error.kind(),
        });
    }
}
