//! External process execution with multiplexed output.
//!
//! [`Process`] is the contract for a program with three redirectable standard
//! streams; [`OsProcess`] implements it over `std::process`. The
//! [`Startable`] and [`Running`] wrappers make the redirect → start → wait
//! ordering structural, and [`ProcessHandle`] reaps a started process on a
//! background thread.
//!
//! Standard output and standard error are usually bound to clones of one
//! [`Funnel`], which serialises their writes onto a shared sink.

mod command;
mod error;
mod funnel;
mod handle;
mod os;

#[cfg(test)]
mod tests;

pub use self::command::{
    ExitStatus, Process, ProcessFactory, Running, STANDARD_STREAMS, Startable, Stream, StreamKind,
    command_label, parse_command_line,
};
pub use self::error::ExecError;
pub use self::funnel::Funnel;
pub use self::handle::ProcessHandle;
pub use self::os::{DIR_VARIABLE, OsProcess, OsProcessFactory};
