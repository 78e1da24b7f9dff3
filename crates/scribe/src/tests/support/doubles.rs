//! Mock collaborators for the router and a script that records its visits.

use std::path::Path;
use std::sync::Mutex;

use mockall::mock;

use scribe_edit::{RunError, Script};
use scribe_exec::{ExecError, Process, ProcessFactory};
use scribe_workspace::{EditableBuffer, Tag, TargetRef, UiContext, Window};

use crate::dispatch::BuiltinVerb;
use crate::workbench::{Workbench, WorkbenchError};

mock! {
    pub(crate) Workbench {}

    impl Workbench for Workbench {
        fn builtin(&mut self, verb: BuiltinVerb, ctx: &mut UiContext) -> Result<(), WorkbenchError>;
        fn install(&mut self, tag: &Tag, spec: &str) -> Result<(), WorkbenchError>;
        fn refresh(&mut self, target: &TargetRef);
        fn jump(&mut self, target: &TargetRef);
        fn find_or_create(&mut self, ctx: &UiContext, dir: &Path, label: &str) -> Window;
    }
}

mock! {
    pub(crate) Factory {}

    impl ProcessFactory for Factory {
        fn create(
            &self,
            argv: &[String],
            work_dir: &Path,
        ) -> Result<(String, Box<dyn Process>), ExecError>;
    }
}

/// Script that appends each buffer's content to a log and fails on buffers
/// containing `fail_on`.
#[derive(Debug, Default)]
pub(crate) struct RecordingScript {
    visits: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingScript {
    pub(crate) fn failing_on(text: &str) -> Self {
        Self {
            visits: Mutex::default(),
            fail_on: Some(text.to_owned()),
        }
    }

    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits.lock().expect("visits mutex poisoned").clone()
    }
}

impl Script for RecordingScript {
    fn run(&self, buffer: &mut dyn EditableBuffer) -> Result<(), RunError> {
        let text = String::from_utf8_lossy(buffer.bytes()).into_owned();
        self.visits
            .lock()
            .expect("visits mutex poisoned")
            .push(text.clone());
        match &self.fail_on {
            Some(pattern) if text.contains(pattern.as_str()) => Err(RunError::NoMatch {
                pattern: pattern.clone(),
            }),
            _ => Ok(()),
        }
    }
}
