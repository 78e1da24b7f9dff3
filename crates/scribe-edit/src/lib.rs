//! Compact structural-regular-expression edit scripts.
//!
//! Scripts are compiled once with [`compile`] and then run against any number
//! of [`EditableBuffer`](scribe_workspace::EditableBuffer)s through the
//! [`Script`] trait. A script is a sequence of addressed commands separated by
//! `;` or newlines:
//!
//! | Address    | Selects                                         |
//! |------------|-------------------------------------------------|
//! | `.`        | the current dot                                 |
//! | `$`        | the empty range at the end                      |
//! | `#n`       | the empty range at byte `n`                     |
//! | `n`        | line `n`, newline included                      |
//! | `/re/`     | the next match after dot, wrapping              |
//! | `a1,a2`    | from the start of `a1` to the end of `a2`       |
//!
//! Commands are `a/text/`, `i/text/`, `c/text/`, `d`, `p`, `s/re/text/[g]` and
//! `x/re/ command`. Each leaves dot on what it touched, so later commands in
//! the same script continue from there.

mod error;
mod parse;
mod program;

#[cfg(test)]
mod tests;

pub use self::error::{CompileError, RunError};
pub use self::program::{Options, Program, Script, compile};
