//! Polymorphic references to command destinations.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::buffer::EditableBuffer;
use crate::column::{Column, Workspace};
use crate::tag::Tag;
use crate::window::Window;

/// An editable buffer that is not part of the tag tree, e.g. a scratch
/// editor owned by a plugin.
pub type SharedEditor = Arc<Mutex<dyn EditableBuffer + Send>>;

/// Reference to whatever a command was issued against.
///
/// Containers fan out to their members: a workspace reaches every column, a
/// column every tag, a tag its body window.
#[derive(Clone)]
pub enum TargetRef {
    /// A single window, either a tag strip or a body.
    Window(Window),
    /// A tag; resolves to its current body.
    Tag(Tag),
    /// Every tag in the column, in order.
    Column(Column),
    /// Every column in the workspace, in order.
    Workspace(Workspace),
    /// A bare editable buffer outside the tree.
    Editor(SharedEditor),
    /// Something that carries no editable buffer (a scrollbar, an image).
    Unsupported {
        /// Description used when reporting the reference.
        kind: String,
    },
}

impl TargetRef {
    /// Builds an unsupported reference.
    #[must_use]
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported { kind: kind.into() }
    }

    /// Wraps a bare editor.
    #[must_use]
    pub fn editor<E>(editor: E) -> Self
    where
        E: EditableBuffer + Send + 'static,
    {
        Self::Editor(Arc::new(Mutex::new(editor)))
    }

    /// Short name of the variant for logs and error messages.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Window(_) => "window",
            Self::Tag(_) => "tag",
            Self::Column(_) => "column",
            Self::Workspace(_) => "workspace",
            Self::Editor(_) => "editor",
            Self::Unsupported { kind } => kind,
        }
    }

    /// Returns `true` for leaf references that hold a buffer directly.
    #[must_use]
    pub const fn is_leaf_editor(&self) -> bool {
        matches!(self, Self::Window(_) | Self::Editor(_))
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window(window) => f.debug_tuple("Window").field(&window.id()).finish(),
            Self::Tag(tag) => f.debug_tuple("Tag").field(&tag.id()).finish(),
            Self::Column(column) => f
                .debug_tuple("Column")
                .field(&column.header().label())
                .finish(),
            Self::Workspace(workspace) => f
                .debug_tuple("Workspace")
                .field(&workspace.header().label())
                .finish(),
            Self::Editor(_) => f.write_str("Editor"),
            Self::Unsupported { kind } => f.debug_struct("Unsupported").field("kind", kind).finish(),
        }
    }
}

impl From<Window> for TargetRef {
    fn from(window: Window) -> Self {
        Self::Window(window)
    }
}

impl From<Tag> for TargetRef {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<Column> for TargetRef {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<Workspace> for TargetRef {
    fn from(workspace: Workspace) -> Self {
        Self::Workspace(workspace)
    }
}
