//! Commands as produced by the user interface.

use std::path::{Path, PathBuf};

use scribe_workspace::TargetRef;

/// A command together with where it came from and what it applies to.
///
/// Events are consumed exactly once by
/// [`CommandRouter::dispatch`](crate::CommandRouter::dispatch).
#[derive(Debug, Clone)]
pub struct CommandEvent {
    text: String,
    destinations: Vec<TargetRef>,
    origin_dir: PathBuf,
    origin_name: String,
}

impl CommandEvent {
    /// Creates an event for `text` with no destinations, issued from the
    /// current directory.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            destinations: Vec::new(),
            origin_dir: PathBuf::from("."),
            origin_name: String::new(),
        }
    }

    /// Adds a destination.
    #[must_use]
    pub fn with_destination(mut self, target: impl Into<TargetRef>) -> Self {
        self.destinations.push(target.into());
        self
    }

    /// Records the directory and file name the command was issued from.
    #[must_use]
    pub fn with_origin(mut self, dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        self.origin_dir = dir.into();
        self.origin_name = name.into();
        self
    }

    /// The raw command text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Targets the command applies to, in order.
    #[must_use]
    pub fn destinations(&self) -> &[TargetRef] {
        &self.destinations
    }

    /// Directory of the issuing window.
    #[must_use]
    pub fn origin_dir(&self) -> &Path {
        &self.origin_dir
    }

    /// File name of the issuing window; may be empty.
    #[must_use]
    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }
}
