//! Focus state threaded through command dispatch.

use tracing::debug;

use crate::column::{Column, Workspace};
use crate::tag::{Tag, WORKSPACE_TARGET};
use crate::target::TargetRef;
use crate::window::Window;

/// Which workspace, column and tag currently own the user's focus.
///
/// The context is passed explicitly into dispatch. [`UiContext::focus`] and
/// [`UiContext::clear_tag`] are the only writers; everything else reads.
#[derive(Debug, Clone)]
pub struct UiContext {
    workspace: Workspace,
    active_column: Option<Column>,
    active_tag: Option<Tag>,
}

impl UiContext {
    /// Creates a context with nothing focused.
    #[must_use]
    pub const fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            active_column: None,
            active_tag: None,
        }
    }

    /// The workspace commands operate within.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The focused column, if any.
    #[must_use]
    pub const fn active_column(&self) -> Option<&Column> {
        self.active_column.as_ref()
    }

    /// The focused tag, if any.
    #[must_use]
    pub const fn active_tag(&self) -> Option<&Tag> {
        self.active_tag.as_ref()
    }

    /// Moves focus to `tag` inside `column`.
    pub fn focus(&mut self, column: Option<Column>, tag: Option<Tag>) {
        debug!(
            target: WORKSPACE_TARGET,
            column = ?column.as_ref().map(|c| c.header().label()),
            tag = ?tag.as_ref().map(Tag::label),
            "focus changed"
        );
        self.active_column = column;
        self.active_tag = tag;
    }

    /// Moves focus to `tag`, looking up its column in the workspace.
    pub fn focus_tag(&mut self, tag: Tag) {
        let column = self.workspace.column_of(&tag);
        self.focus(column, Some(tag));
    }

    /// Drops the tag focus while keeping the column.
    pub fn clear_tag(&mut self) {
        let column = self.active_column.take();
        self.focus(column, None);
    }

    /// Body of the focused tag: the editor a bare command line reads from.
    #[must_use]
    pub fn current_editor(&self) -> Option<Window> {
        self.active_tag.as_ref().map(Tag::body)
    }

    /// Substitutes the active tag's body when `target` names its strip.
    ///
    /// Commands typed into the active tag's strip are addressed to the strip
    /// window, but they are meant for the document underneath it.
    #[must_use]
    pub fn resolve_active(&self, target: &TargetRef) -> TargetRef {
        match (target, self.active_tag.as_ref()) {
            (TargetRef::Window(window), Some(tag)) if window.same(tag.strip()) => {
                TargetRef::Window(tag.body())
            }
            _ => target.clone(),
        }
    }
}
