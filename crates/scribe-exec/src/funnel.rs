//! A writer shared by many producers without interleaving their writes.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Serialises writes from many producers onto one sink.
///
/// Every clone of a funnel shares the same sink and lock. A single
/// [`Write::write`] call holds the lock for the whole buffer, so the bytes of
/// one call always land contiguously. Ordering between producers is the order
/// in which they acquire the lock.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
///
/// use scribe_exec::Funnel;
///
/// let sink = Arc::new(Mutex::new(Vec::new()));
/// let mut out = Funnel::new(Arc::clone(&sink));
/// let mut err = out.clone();
/// out.write_all(b"stdout ").unwrap();
/// err.write_all(b"stderr").unwrap();
/// assert_eq!(sink.lock().unwrap().as_slice(), b"stdout stderr");
/// ```
pub struct Funnel<W> {
    sink: Arc<Mutex<W>>,
}

impl<W> Funnel<W> {
    /// Wraps a sink that may also be locked by other owners.
    #[must_use]
    pub const fn new(sink: Arc<Mutex<W>>) -> Self {
        Self { sink }
    }

    /// The shared sink.
    #[must_use]
    pub const fn sink(&self) -> &Arc<Mutex<W>> {
        &self.sink
    }
}

impl<W> Clone for Funnel<W> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<W> fmt::Debug for Funnel<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Funnel")
            .field("writers", &Arc::strong_count(&self.sink))
            .finish()
    }
}

impl<W: Write> Write for Funnel<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("funnel sink poisoned"))?;
        sink.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink
            .lock()
            .map_err(|_| io::Error::other("funnel sink poisoned"))?
            .flush()
    }
}
