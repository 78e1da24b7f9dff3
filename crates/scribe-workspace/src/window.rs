//! Shared handles to window bodies.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::buffer::TextBuffer;

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a window for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Cloneable handle to an editable window body.
///
/// Clones refer to the same buffer. The buffer sits behind its own mutex so a
/// process writing into a result window never blocks writes to any other
/// window.
#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    body: Arc<Mutex<TextBuffer>>,
}

impl Window {
    /// Creates a window over an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(TextBuffer::new())
    }

    /// Creates a window over `buffer`.
    #[must_use]
    pub fn with_buffer(buffer: TextBuffer) -> Self {
        Self {
            id: WindowId::next(),
            body: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Creates a window holding `text`.
    #[must_use]
    pub fn with_text(text: impl Into<Vec<u8>>) -> Self {
        Self::with_buffer(TextBuffer::from_bytes(text))
    }

    /// Returns the window identity.
    #[must_use]
    pub const fn id(&self) -> WindowId {
        self.id
    }

    /// Locks the body for reading or mutation.
    ///
    /// A poisoned lock is recovered: a panic in another writer must not make
    /// the window permanently unusable.
    pub fn lock(&self) -> MutexGuard<'_, TextBuffer> {
        self.body
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Returns the shared body, e.g. to hand to a funnel.
    #[must_use]
    pub fn shared(&self) -> Arc<Mutex<TextBuffer>> {
        Arc::clone(&self.body)
    }

    /// Returns a lossy UTF-8 copy of the content.
    #[must_use]
    pub fn text(&self) -> String {
        self.lock().to_string_lossy()
    }

    /// Returns `true` when both handles refer to the same body.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::EditableBuffer;

    #[test]
    fn clones_share_the_body() {
        let window = Window::with_text("abc");
        let clone = window.clone();
        clone.lock().insert(b"!", 3);
        assert_eq!(window.text(), "abc!");
        assert!(window.same(&clone));
    }

    #[test]
    fn fresh_windows_have_distinct_ids() {
        assert_ne!(Window::new().id(), Window::new().id());
    }
}
