//! Serialisable snapshot of the column and tag arrangement.

use std::fs;

use serde::{Deserialize, Serialize};

use scribe_workspace::{Column, Tag, Window, Workspace};

/// Column and tag labels, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Columns from left to right.
    pub columns: Vec<ColumnLayout>,
}

/// One column of a [`Layout`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Label of the column header.
    pub label: String,
    /// Tag labels from top to bottom.
    pub tags: Vec<String>,
}

impl Layout {
    /// Records the current arrangement of `workspace`.
    #[must_use]
    pub fn capture(workspace: &Workspace) -> Self {
        let columns = workspace
            .columns()
            .iter()
            .map(|column| ColumnLayout {
                label: column.header().label(),
                tags: column.tags().iter().map(Tag::label).collect(),
            })
            .collect();
        Self { columns }
    }

    /// Replaces every column of `workspace` with this arrangement.
    ///
    /// Tags labelled with a readable file get its content as their body.
    /// Returns the first restored column and its first tag.
    pub fn restore(&self, workspace: &Workspace) -> Option<(Column, Option<Tag>)> {
        while workspace.remove(0).is_some() {}
        for layout in &self.columns {
            let column = Column::new(layout.label.clone());
            for label in &layout.tags {
                let body = fs::read(label).map(Window::with_text).unwrap_or_default();
                column.push(Tag::with_body(label.clone(), body));
            }
            workspace.push(column);
        }
        let first = workspace.columns().into_iter().next()?;
        let tag = first.tags().into_iter().next();
        Some((first, tag))
    }
}
