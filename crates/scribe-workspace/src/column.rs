//! Columns and the workspace grid.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::tag::{Tag, WORKSPACE_TARGET};

#[derive(Debug)]
struct Members<T> {
    header: Tag,
    list: RwLock<Vec<T>>,
}

impl<T: Clone> Members<T> {
    fn new(header: Tag) -> Self {
        Self {
            header,
            list: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.list.read().unwrap_or_else(|poison| poison.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.list.write().unwrap_or_else(|poison| poison.into_inner())
    }
}

/// Ordered vertical grouping of tags.
#[derive(Debug, Clone)]
pub struct Column {
    inner: Arc<Members<Tag>>,
}

impl Column {
    /// Creates an empty column whose header tag carries `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Members::new(Tag::new(label))),
        }
    }

    /// The column's own header tag.
    #[must_use]
    pub fn header(&self) -> &Tag {
        &self.inner.header
    }

    /// Snapshot of the member tags in display order.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        self.inner.read().clone()
    }

    /// Number of member tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` when the column has no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Appends a tag.
    pub fn push(&self, tag: Tag) {
        debug!(target: WORKSPACE_TARGET, tag = %tag.id(), "adding tag to column");
        self.inner.write().push(tag);
    }

    /// Position of `tag` in the column.
    #[must_use]
    pub fn position(&self, tag: &Tag) -> Option<usize> {
        self.inner.read().iter().position(|member| member.same(tag))
    }

    /// Removes and returns the tag at `index`.
    pub fn remove(&self, index: usize) -> Option<Tag> {
        let mut list = self.inner.write();
        (index < list.len()).then(|| list.remove(index))
    }

    /// Reorders member tags with `compare`.
    pub fn sort_by<F>(&self, compare: F)
    where
        F: FnMut(&Tag, &Tag) -> std::cmp::Ordering,
    {
        self.inner.write().sort_by(compare);
    }

    /// Returns `true` when both handles refer to the same column.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Top-level ordered grouping of columns.
#[derive(Debug, Clone)]
pub struct Workspace {
    inner: Arc<Members<Column>>,
}

impl Workspace {
    /// Creates an empty workspace whose header tag carries `label`.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Members::new(Tag::new(label))),
        }
    }

    /// The workspace's own header tag.
    #[must_use]
    pub fn header(&self) -> &Tag {
        &self.inner.header
    }

    /// Snapshot of the columns in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.inner.read().clone()
    }

    /// Appends a column.
    pub fn push(&self, column: Column) {
        self.inner.write().push(column);
    }

    /// Position of `column` in the workspace.
    #[must_use]
    pub fn position(&self, column: &Column) -> Option<usize> {
        self.inner
            .read()
            .iter()
            .position(|member| member.same(column))
    }

    /// Removes and returns the column at `index`.
    pub fn remove(&self, index: usize) -> Option<Column> {
        let mut list = self.inner.write();
        (index < list.len()).then(|| list.remove(index))
    }

    /// Finds the first tag, in column then tag order, labelled `label`.
    #[must_use]
    pub fn find_tag(&self, label: &str) -> Option<Tag> {
        self.columns()
            .iter()
            .flat_map(Column::tags)
            .find(|tag| tag.label() == label)
    }

    /// Finds the column holding `tag`.
    #[must_use]
    pub fn column_of(&self, tag: &Tag) -> Option<Column> {
        self.columns()
            .into_iter()
            .find(|column| column.position(tag).is_some())
    }
}
