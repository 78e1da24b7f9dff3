//! The user-interface collaborator commands are delegated to.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use scribe_workspace::{Tag, TargetRef, UiContext, Window};

use crate::dispatch::BuiltinVerb;

/// Errors raised by a workbench while executing a built-in.
#[derive(Debug, Clone, Error)]
pub enum WorkbenchError {
    /// The verb acts on the active tag and none has focus.
    #[error("no active tag")]
    NoActiveTag,

    /// The verb acts on the active column and none has focus.
    #[error("no active column")]
    NoActiveColumn,

    /// This workbench cannot perform the verb.
    #[error("not supported by this workbench")]
    Unsupported,

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A dumped layout could not be encoded or decoded.
    #[error("layout {}: {source}", path.display())]
    Layout {
        /// The layout file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl WorkbenchError {
    /// Wraps an I/O failure on `path`.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }

    /// Wraps a layout encoding failure on `path`.
    pub fn layout(path: &Path, source: serde_json::Error) -> Self {
        Self::Layout {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }
}

/// Window-system operations the command router depends on.
///
/// Rendering, layout geometry and input handling live behind this trait.
/// [`HeadlessWorkbench`](crate::HeadlessWorkbench) implements it without a
/// display.
pub trait Workbench {
    /// Executes a built-in verb, possibly moving focus.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkbenchError`] when the verb cannot be carried out.
    fn builtin(&mut self, verb: BuiltinVerb, ctx: &mut UiContext) -> Result<(), WorkbenchError>;

    /// Installs `spec` as a command on `tag`.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkbenchError`] when the command cannot be installed.
    fn install(&mut self, tag: &Tag, spec: &str) -> Result<(), WorkbenchError>;

    /// Redraws `target` after an edit.
    fn refresh(&mut self, target: &TargetRef);

    /// Scrolls `target` so its selection is visible.
    fn jump(&mut self, target: &TargetRef);

    /// Returns the body of the tag labelled `label`, creating the tag when
    /// none exists. `dir` is the directory the label was derived from.
    fn find_or_create(&mut self, ctx: &UiContext, dir: &Path, label: &str) -> Window;
}
