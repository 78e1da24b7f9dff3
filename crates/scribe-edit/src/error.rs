//! Errors raised while compiling or running edit scripts.

use thiserror::Error;

/// The script text is not valid.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The script contains no commands.
    #[error("empty edit script")]
    Empty,

    /// A command letter is not part of the language.
    #[error("unknown command '{command}' at offset {offset}")]
    UnknownCommand {
        /// The offending character.
        command: char,
        /// Byte offset into the script.
        offset: usize,
    },

    /// The parser needed something else at this position.
    #[error("expected {expected} at offset {offset}")]
    Expected {
        /// Human-readable description of what was expected.
        expected: &'static str,
        /// Byte offset into the script.
        offset: usize,
    },

    /// A numeric address does not fit in memory offsets.
    #[error("number out of range at offset {offset}")]
    Number {
        /// Byte offset into the script.
        offset: usize,
    },

    /// A regular expression failed to compile.
    #[error("invalid regular expression at offset {offset}: {source}")]
    Regex {
        /// Byte offset of the pattern's opening delimiter.
        offset: usize,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// A compiled script could not be applied to a particular buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A byte or line address lies past the end of the buffer.
    #[error("address {address} out of range for a buffer of {len} bytes")]
    OutOfRange {
        /// The address as written in the script.
        address: String,
        /// Buffer length at evaluation time.
        len: usize,
    },

    /// A regular expression address found nothing.
    #[error("no match for /{pattern}/")]
    NoMatch {
        /// The pattern that failed to match.
        pattern: String,
    },

    /// The second half of a compound address precedes the first.
    #[error("addresses out of order: {q0} > {q1}")]
    OutOfOrder {
        /// Start of the first address.
        q0: usize,
        /// End of the second address.
        q1: usize,
    },
}
