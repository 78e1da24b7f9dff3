//! Tags: a labelled command strip owning one body window.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::window::Window;

static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(1);

/// Tracing target for workspace tree changes.
pub(crate) const WORKSPACE_TARGET: &str = "scribe_workspace";

/// Stable identity of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u64);

impl TagId {
    fn next() -> Self {
        Self(NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug)]
struct TagInner {
    id: TagId,
    label: RwLock<String>,
    strip: Window,
    body: RwLock<Window>,
}

/// Cloneable handle to a tag.
///
/// A tag has two windows: the strip, where commands are typed, and the body,
/// which holds the document. The body may be swapped (for example when a file
/// is reloaded into a fresh window); readers always see the current one.
#[derive(Debug, Clone)]
pub struct Tag {
    inner: Arc<TagInner>,
}

impl Tag {
    /// Creates a tag with an empty body.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_body(label, Window::new())
    }

    /// Creates a tag owning `body`.
    #[must_use]
    pub fn with_body(label: impl Into<String>, body: Window) -> Self {
        let text: String = label.into();
        let strip = Window::with_text(text.clone());
        Self {
            inner: Arc::new(TagInner {
                id: TagId::next(),
                label: RwLock::new(text),
                strip,
                body: RwLock::new(body),
            }),
        }
    }

    /// Returns the tag identity.
    #[must_use]
    pub fn id(&self) -> TagId {
        self.inner.id
    }

    /// Returns the current label, usually a file or directory name.
    #[must_use]
    pub fn label(&self) -> String {
        self.inner
            .label
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    /// Renames the tag.
    pub fn set_label(&self, label: impl Into<String>) {
        *self
            .inner
            .label
            .write()
            .unwrap_or_else(|poison| poison.into_inner()) = label.into();
    }

    /// Returns the command strip window.
    ///
    /// When the strip of the active tag is named as a command destination,
    /// the body is substituted for it; see `UiContext::resolve_active`.
    #[must_use]
    pub fn strip(&self) -> &Window {
        &self.inner.strip
    }

    /// Returns the current body window.
    #[must_use]
    pub fn body(&self) -> Window {
        self.inner
            .body
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    /// Replaces the body, returning the previous one.
    pub fn swap_body(&self, body: Window) -> Window {
        let mut slot = self
            .inner
            .body
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        debug!(
            target: WORKSPACE_TARGET,
            tag = %self.inner.id,
            old = %slot.id(),
            new = %body.id(),
            "swapping tag body"
        );
        std::mem::replace(&mut *slot, body)
    }

    /// Returns `true` when both handles refer to the same tag.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
