//! Compiled programs and their execution against editable buffers.

use regex::bytes::Regex;
use tracing::debug;

use scribe_workspace::EditableBuffer;

use crate::error::{CompileError, RunError};
use crate::parse::{Address, Command, Op, parse};

/// Tracing target for script compilation and execution.
const EDIT_TARGET: &str = "scribe_edit";

/// Context a script is compiled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Label of the event that produced the script, when known.
    pub sender: Option<String>,
    /// Absolute path of the file or directory the script was issued from.
    pub origin: String,
}

impl Options {
    /// Options bound to `origin` with no sender.
    #[must_use]
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            sender: None,
            origin: origin.into(),
        }
    }
}

/// Anything that can be run against one editable buffer.
///
/// [`Program`] is the production implementation; resolution code depends on
/// this trait so tests can observe which buffers a script visits.
pub trait Script {
    /// Runs the script against `buffer`, mutating its content and dot.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] when an address cannot be evaluated against this
    /// buffer. Commands already applied stay applied.
    fn run(&self, buffer: &mut dyn EditableBuffer) -> Result<(), RunError>;
}

/// An immutable compiled edit script bound to an origin.
#[derive(Debug, Clone)]
pub struct Program {
    commands: Vec<Command>,
    options: Options,
}

impl Program {
    /// The options the program was compiled with.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }
}

/// Compiles `text` into a [`Program`].
///
/// # Errors
///
/// Returns a [`CompileError`] describing the first syntax error.
///
/// # Examples
///
/// ```
/// use scribe_edit::{Options, Script, compile};
/// use scribe_workspace::{EditableBuffer, TextBuffer};
///
/// let program = compile(",x/cat/ c/dog/", &Options::with_origin("/tmp")).unwrap();
/// let mut buffer = TextBuffer::from_bytes("cat and cat");
/// program.run(&mut buffer).unwrap();
/// assert_eq!(buffer.bytes(), b"dog and dog");
/// ```
pub fn compile(text: &str, options: &Options) -> Result<Program, CompileError> {
    let commands = parse(text)?;
    debug!(
        target: EDIT_TARGET,
        origin = %options.origin,
        sender = ?options.sender,
        commands = commands.len(),
        "compiled edit script"
    );
    Ok(Program {
        commands,
        options: options.clone(),
    })
}

impl Script for Program {
    fn run(&self, buffer: &mut dyn EditableBuffer) -> Result<(), RunError> {
        for command in &self.commands {
            execute(command, buffer)?;
        }
        Ok(())
    }
}

fn execute(command: &Command, buffer: &mut dyn EditableBuffer) -> Result<(), RunError> {
    let dot = buffer.dot();
    let (q0, q1) = match &command.address {
        Some(address) => evaluate(address, buffer, dot)?,
        None => dot,
    };
    match &command.op {
        Op::Append(text) => {
            let n = buffer.insert(text, q1);
            buffer.select(q1, q1 + n);
        }
        Op::Insert(text) => {
            let n = buffer.insert(text, q0);
            buffer.select(q0, q0 + n);
        }
        Op::Change(text) => {
            buffer.delete(q0, q1);
            let n = buffer.insert(text, q0);
            buffer.select(q0, q0 + n);
        }
        Op::Delete => {
            buffer.delete(q0, q1);
            buffer.select(q0, q0);
        }
        Op::Print => buffer.select(q0, q1),
        Op::Substitute {
            pattern,
            replacement,
            global,
        } => substitute(buffer, (q0, q1), pattern, replacement, *global),
        Op::Loop { pattern, body } => {
            let before = buffer.len();
            let matches = find_all(buffer, (q0, q1), pattern);
            // Back to front so earlier match offsets stay valid.
            for (m0, m1) in matches.into_iter().rev() {
                buffer.select(m0, m1);
                execute(body, buffer)?;
            }
            let end = (q1 + buffer.len()).saturating_sub(before);
            buffer.select(q0, end.max(q0));
        }
    }
    Ok(())
}

fn find_all(
    buffer: &dyn EditableBuffer,
    (q0, q1): (usize, usize),
    pattern: &Regex,
) -> Vec<(usize, usize)> {
    let Some(haystack) = buffer.bytes().get(q0..q1) else {
        return Vec::new();
    };
    pattern
        .find_iter(haystack)
        .map(|m| (q0 + m.start(), q0 + m.end()))
        .collect()
}

fn substitute(
    buffer: &mut dyn EditableBuffer,
    (q0, q1): (usize, usize),
    pattern: &Regex,
    replacement: &[u8],
    global: bool,
) {
    let before = buffer.len();
    let mut matches = find_all(buffer, (q0, q1), pattern);
    if !global {
        matches.truncate(1);
    }
    for (m0, m1) in matches.into_iter().rev() {
        buffer.delete(m0, m1);
        buffer.insert(replacement, m0);
    }
    let end = (q1 + buffer.len()).saturating_sub(before);
    buffer.select(q0, end.max(q0));
}

fn evaluate(
    address: &Address,
    buffer: &dyn EditableBuffer,
    dot: (usize, usize),
) -> Result<(usize, usize), RunError> {
    let len = buffer.len();
    match address {
        Address::Dot => Ok(dot),
        Address::End => Ok((len, len)),
        Address::Byte(n) if *n <= len => Ok((*n, *n)),
        Address::Byte(n) => Err(RunError::OutOfRange {
            address: format!("#{n}"),
            len,
        }),
        Address::Line(n) => line(buffer.bytes(), *n).ok_or_else(|| RunError::OutOfRange {
            address: n.to_string(),
            len,
        }),
        Address::Pattern(pattern) => search(buffer.bytes(), dot.1, pattern),
        Address::Range(first, second) => {
            let start = match first {
                Some(inner) => evaluate(inner, buffer, dot)?,
                None => (0, 0),
            };
            let end = match second {
                Some(inner) => evaluate(inner, buffer, start)?,
                None => (len, len),
            };
            if end.1 < start.0 {
                return Err(RunError::OutOfOrder {
                    q0: start.0,
                    q1: end.1,
                });
            }
            Ok((start.0, end.1))
        }
    }
}

/// Range of line `n` (1-based) including its newline. Line 0 is the empty
/// range at the start of the buffer.
fn line(bytes: &[u8], n: usize) -> Option<(usize, usize)> {
    if n == 0 {
        return Some((0, 0));
    }
    let mut start = 0;
    for _ in 1..n {
        let newline = bytes.get(start..)?.iter().position(|&b| b == b'\n')?;
        start += newline + 1;
    }
    if start >= bytes.len() {
        return None;
    }
    let end = bytes
        .get(start..)?
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| start + i + 1);
    Some((start, end))
}

/// Next match at or after `from`, wrapping to the start of the buffer.
fn search(bytes: &[u8], from: usize, pattern: &Regex) -> Result<(usize, usize), RunError> {
    let start = from.min(bytes.len());
    let after = bytes
        .get(start..)
        .and_then(|tail| pattern.find(tail))
        .map(|m| (start + m.start(), start + m.end()));
    after
        .or_else(|| pattern.find(bytes).map(|m| (m.start(), m.end())))
        .ok_or_else(|| RunError::NoMatch {
            pattern: pattern.as_str().to_owned(),
        })
}
