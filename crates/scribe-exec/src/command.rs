//! The process contract and the typestate wrappers that enforce its ordering.
//!
//! A [`Process`] is redirected, started exactly once, then waited on exactly
//! once. Callers never drive the trait directly: [`Startable::bind`] performs
//! all three redirections, [`Startable::start`] consumes it and yields a
//! [`Running`], and [`Running::wait`] consumes that.

use std::fmt;
use std::io::{Read, Write};
use std::path::{MAIN_SEPARATOR, Path};

use crate::error::ExecError;

/// Number of standard streams a process exposes.
pub const STANDARD_STREAMS: usize = 3;

/// One end of a standard stream binding.
pub enum Stream {
    /// Source for the process's standard input.
    Reader(Box<dyn Read + Send>),
    /// Sink for standard output or standard error.
    Writer(Box<dyn Write + Send>),
}

impl Stream {
    /// Wraps a reader.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Wraps a writer.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer(Box::new(writer))
    }

    /// Direction of the binding.
    #[must_use]
    pub const fn kind(&self) -> StreamKind {
        match self {
            Self::Reader(_) => StreamKind::Reader,
            Self::Writer(_) => StreamKind::Writer,
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream::{:?}", self.kind())
    }
}

/// Direction of a bound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Feeds the process.
    Reader,
    /// Receives process output.
    Writer,
}

impl StreamKind {
    /// Direction descriptor `fd` must be bound with.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::BadFd`] for descriptors outside `0..=2`.
    pub const fn expected_for(fd: usize) -> Result<Self, ExecError> {
        match fd {
            0 => Ok(Self::Reader),
            1 | 2 => Ok(Self::Writer),
            _ => Err(ExecError::BadFd { fd }),
        }
    }
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    /// Status carrying `code`; `None` means the process was killed by a
    /// signal.
    #[must_use]
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// The exit code, if the process exited normally.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        self.code
    }

    /// Returns `true` for a zero exit code.
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self::new(status.code())
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// An external process with three redirectable standard streams.
pub trait Process: Send {
    /// The argument vector, program name first.
    fn args(&self) -> Vec<String>;

    /// The environment the process will run with, as `KEY=VALUE` strings.
    fn env(&self) -> Vec<String>;

    /// Direction of the stream bound to `fd`, or `None` while unbound.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::BadFd`] for descriptors outside `0..=2`.
    fn fd(&self, fd: usize) -> Result<Option<StreamKind>, ExecError>;

    /// Binds `stream` to descriptor `fd`, replacing any earlier binding.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::BadFd`] for descriptors outside `0..=2`,
    /// [`ExecError::Direction`] when the stream points the wrong way and
    /// [`ExecError::AlreadyStarted`] once the process is running.
    fn redir(&mut self, fd: usize, stream: Stream) -> Result<(), ExecError>;

    /// Launches the process and begins copying its streams.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::NoFd`] when a stream is unbound, or the spawn
    /// failure reported by the operating system.
    fn start(&mut self) -> Result<(), ExecError>;

    /// Blocks until the process exits and its streams are drained.
    ///
    /// # Errors
    ///
    /// Returns the first stream or reaping failure.
    fn wait(&mut self) -> Result<ExitStatus, ExecError>;
}

/// Builds processes from command lines.
pub trait ProcessFactory: Send + Sync {
    /// Creates an unstarted process for `argv` running in `work_dir`.
    ///
    /// Returns the display name used to label the process's output together
    /// with the process itself.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::EmptyCommand`] when `argv` is empty.
    fn create(
        &self,
        argv: &[String],
        work_dir: &Path,
    ) -> Result<(String, Box<dyn Process>), ExecError>;
}

/// A process whose three standard streams are bound.
#[derive(Debug)]
pub struct Startable {
    name: String,
    process: Box<dyn Process>,
}

impl fmt::Debug for dyn Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("args", &self.args())
            .finish_non_exhaustive()
    }
}

impl Startable {
    /// Redirects all three standard streams of `process`.
    ///
    /// # Errors
    ///
    /// Returns the first redirection failure; the process is dropped
    /// unstarted.
    pub fn bind(
        name: impl Into<String>,
        mut process: Box<dyn Process>,
        stdin: Stream,
        stdout: Stream,
        stderr: Stream,
    ) -> Result<Self, ExecError> {
        process.redir(0, stdin)?;
        process.redir(1, stdout)?;
        process.redir(2, stderr)?;
        Ok(Self {
            name: name.into(),
            process,
        })
    }

    /// Display name of the process.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts the process.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure; nothing is left to wait for.
    pub fn start(mut self) -> Result<Running, ExecError> {
        self.process.start()?;
        Ok(Running {
            name: self.name,
            process: self.process,
        })
    }
}

/// A started process awaiting its single wait.
#[derive(Debug)]
pub struct Running {
    name: String,
    process: Box<dyn Process>,
}

impl Running {
    /// Display name of the process.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns the reaping or stream-copy failure.
    pub fn wait(mut self) -> Result<ExitStatus, ExecError> {
        self.process.wait()
    }
}

/// Splits a command line on whitespace.
///
/// # Errors
///
/// Returns [`ExecError::EmptyCommand`] when no words remain.
///
/// # Examples
///
/// ```
/// use scribe_exec::parse_command_line;
///
/// let argv = parse_command_line("  sort -r  ").unwrap();
/// assert_eq!(argv, ["sort", "-r"]);
/// assert!(parse_command_line(" \t ").is_err());
/// ```
pub fn parse_command_line(line: &str) -> Result<Vec<String>, ExecError> {
    let argv: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
    if argv.is_empty() {
        return Err(ExecError::EmptyCommand);
    }
    Ok(argv)
}

/// Label of the result buffer collecting output of `name` run in `dir`.
///
/// # Examples
///
/// ```
/// use scribe_exec::command_label;
///
/// # if std::path::MAIN_SEPARATOR == '/' {
/// assert_eq!(command_label("cat", "/tmp"), "/tmp/cat-/tmp");
/// assert_eq!(command_label("ls", "/"), "/ls-/");
/// # }
/// ```
#[must_use]
pub fn command_label(name: &str, dir: &str) -> String {
    if dir.ends_with(MAIN_SEPARATOR) {
        format!("{dir}{name}-{dir}")
    } else {
        format!("{dir}{MAIN_SEPARATOR}{name}-{dir}")
    }
}

/// Display name for a program path: its final component.
pub(crate) fn program_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map_or_else(|| program.to_owned(), |name| name.to_string_lossy().into_owned())
}
