//! Resolution of command destinations to editable buffers.

use tracing::debug;

use scribe_edit::Script;
use scribe_workspace::{Column, EditableBuffer, TargetRef, UiContext, Window, Workspace};

use super::errors::DispatchError;
use super::router::DISPATCH_TARGET;
use crate::report::Reporter;

/// Totals for one resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Buffers the script ran against successfully.
    pub applied: usize,
    /// Buffers or references that failed; each was reported.
    pub failures: usize,
}

impl Resolution {
    fn absorb(&mut self, other: Self) {
        self.applied += other.applied;
        self.failures += other.failures;
    }

    const fn applied() -> Self {
        Self {
            applied: 1,
            failures: 0,
        }
    }

    const fn failed() -> Self {
        Self {
            applied: 0,
            failures: 1,
        }
    }
}

/// Runs `script` against every buffer `target` reaches.
///
/// Containers are walked in display order and a failing member does not stop
/// its siblings. The strip window of the active tag stands in for that tag's
/// body.
pub fn resolve(
    target: &TargetRef,
    ctx: &UiContext,
    script: &dyn Script,
    command: &str,
    reporter: &dyn Reporter,
) -> Resolution {
    let walk = Walk {
        script,
        command,
        reporter,
    };
    match target {
        TargetRef::Window(_) => match ctx.resolve_active(target) {
            TargetRef::Window(window) => walk.window(&window),
            other => walk.unknown(other.kind()),
        },
        TargetRef::Tag(tag) => walk.window(&tag.body()),
        TargetRef::Column(column) => walk.column(column),
        TargetRef::Workspace(workspace) => walk.workspace(workspace),
        TargetRef::Editor(editor) => {
            let mut buffer = editor.lock().unwrap_or_else(|poison| poison.into_inner());
            walk.run("editor", &mut *buffer)
        }
        TargetRef::Unsupported { kind } => walk.unknown(kind),
    }
}

struct Walk<'a> {
    script: &'a dyn Script,
    command: &'a str,
    reporter: &'a dyn Reporter,
}

impl Walk<'_> {
    fn window(&self, window: &Window) -> Resolution {
        let mut buffer = window.lock();
        self.run(&window.id().to_string(), &mut *buffer)
    }

    fn column(&self, column: &Column) -> Resolution {
        let mut total = Resolution::default();
        for tag in column.tags() {
            total.absorb(self.window(&tag.body()));
        }
        total
    }

    fn workspace(&self, workspace: &Workspace) -> Resolution {
        let mut total = Resolution::default();
        for column in workspace.columns() {
            total.absorb(self.column(&column));
        }
        total
    }

    fn run(&self, name: &str, buffer: &mut dyn EditableBuffer) -> Resolution {
        debug!(target: DISPATCH_TARGET, buffer = name, "running edit script");
        match self.script.run(buffer) {
            Ok(()) => Resolution::applied(),
            Err(source) => {
                self.reporter
                    .command_failed(self.command, &DispatchError::edit(name, source));
                Resolution::failed()
            }
        }
    }

    fn unknown(&self, kind: &str) -> Resolution {
        self.reporter
            .command_failed(self.command, &DispatchError::unknown_target(kind));
        Resolution::failed()
    }
}
