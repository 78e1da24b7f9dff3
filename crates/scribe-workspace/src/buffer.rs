//! Editable byte buffers with a current selection ("dot").
//!
//! [`EditableBuffer`] is the capability every edit target exposes: a byte
//! content, a selection range `[q0, q1)` over it, and insert/delete at
//! arbitrary offsets. [`TextBuffer`] is the in-memory implementation used by
//! windows and by result buffers receiving process output.

use std::io;

/// Capability shared by every entity an edit script can run against.
///
/// Offsets are byte offsets. Implementations clamp out-of-range offsets to the
/// buffer length rather than panicking.
pub trait EditableBuffer {
    /// Returns the current selection as `(q0, q1)` with `q0 <= q1`.
    fn dot(&self) -> (usize, usize);

    /// Replaces the current selection.
    fn select(&mut self, q0: usize, q1: usize);

    /// Returns the full content.
    fn bytes(&self) -> &[u8];

    /// Returns the content length in bytes.
    fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Returns `true` when the buffer holds no content.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `text` at offset `at`, returning the number of bytes inserted.
    fn insert(&mut self, text: &[u8], at: usize) -> usize;

    /// Deletes `[q0, q1)`, returning the number of bytes removed.
    fn delete(&mut self, q0: usize, q1: usize) -> usize;

    /// Returns a copy of the bytes inside the current selection.
    fn selected(&self) -> Vec<u8> {
        let (q0, q1) = self.dot();
        self.bytes().get(q0..q1).map(<[u8]>::to_vec).unwrap_or_default()
    }
}

/// In-memory byte buffer with a selection.
///
/// Insertions and deletions keep the selection anchored to the text it
/// covered: edits before the dot shift it, edits inside it stretch or shrink
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: Vec<u8>,
    q0: usize,
    q1: usize,
}

impl TextBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: Vec::new(),
            q0: 0,
            q1: 0,
        }
    }

    /// Creates a buffer holding `content` with an empty dot at offset zero.
    #[must_use]
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            q0: 0,
            q1: 0,
        }
    }

    /// Replaces the whole content and resets the dot to the start.
    pub fn replace_all(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
        self.q0 = 0;
        self.q1 = 0;
    }

    /// Returns the content as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.content.len())
    }
}

impl EditableBuffer for TextBuffer {
    fn dot(&self) -> (usize, usize) {
        (self.q0, self.q1)
    }

    fn select(&mut self, q0: usize, q1: usize) {
        let (lo, hi) = if q0 <= q1 { (q0, q1) } else { (q1, q0) };
        self.q0 = self.clamp(lo);
        self.q1 = self.clamp(hi);
    }

    fn bytes(&self) -> &[u8] {
        &self.content
    }

    fn insert(&mut self, text: &[u8], at: usize) -> usize {
        let offset = self.clamp(at);
        let n = text.len();
        self.content.splice(offset..offset, text.iter().copied());
        if offset < self.q0 {
            self.q0 += n;
        }
        if offset < self.q1 {
            self.q1 += n;
        }
        n
    }

    fn delete(&mut self, q0: usize, q1: usize) -> usize {
        let lo = self.clamp(q0.min(q1));
        let hi = self.clamp(q0.max(q1));
        let n = hi - lo;
        if n == 0 {
            return 0;
        }
        self.content.drain(lo..hi);
        let shift = |q: usize| {
            if q >= hi {
                q - n
            } else if q > lo {
                lo
            } else {
                q
            }
        };
        self.q0 = shift(self.q0);
        self.q1 = shift(self.q1);
        n
    }
}

/// Appends written bytes to the end of the buffer.
///
/// This is how process output reaches a result buffer; the dot is left where
/// it was.
impl io::Write for TextBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = self.content.len();
        Ok(self.insert(buf, end))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
