//! Test doubles shared by the unit and behaviour suites.

mod doubles;
mod reporter;

pub(crate) use doubles::{MockFactory, MockWorkbench, RecordingScript};
pub(crate) use reporter::{RecordingReporter, ReportEvent};
