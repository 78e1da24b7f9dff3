//! Operating-system processes backed by `std::process`.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::command::{
    ExitStatus, Process, ProcessFactory, STANDARD_STREAMS, Stream, StreamKind, program_name,
};
use crate::error::ExecError;

/// Tracing target for OS process operations.
const OS_TARGET: &str = "scribe_exec::os";

/// Environment variable naming the directory a command runs in.
pub const DIR_VARIABLE: &str = "SCRIBE_DIR";

/// Creates [`OsProcess`]es.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsProcessFactory {
    inherit_environment: bool,
    chunk_size: usize,
}

impl OsProcessFactory {
    /// Factory whose processes copy output in chunks of at most
    /// `chunk_size` bytes and optionally inherit the parent environment.
    #[must_use]
    pub const fn new(inherit_environment: bool, chunk_size: usize) -> Self {
        Self {
            inherit_environment,
            chunk_size: if chunk_size == 0 { 1 } else { chunk_size },
        }
    }
}

impl ProcessFactory for OsProcessFactory {
    fn create(
        &self,
        argv: &[String],
        work_dir: &Path,
    ) -> Result<(String, Box<dyn Process>), ExecError> {
        let process = OsProcess::new(argv.to_vec(), work_dir, self.inherit_environment)?
            .with_chunk_size(self.chunk_size);
        Ok((process.name(), Box::new(process)))
    }
}

enum State {
    Idle,
    Running {
        child: Child,
        workers: Vec<(usize, JoinHandle<io::Result<()>>)>,
    },
    Finished,
}

/// An external program run through `std::process::Command`.
///
/// Starting the process spawns one thread feeding standard input and one per
/// output stream. Every chunk read from an output pipe is handed to the bound
/// writer in a single `write_all`, so a shared [`Funnel`](crate::Funnel)
/// receives each chunk contiguously.
pub struct OsProcess {
    argv: Vec<String>,
    work_dir: PathBuf,
    env: Vec<(String, String)>,
    chunk_size: usize,
    streams: [Option<Stream>; STANDARD_STREAMS],
    state: State,
}

impl OsProcess {
    /// Prepares `argv` to run in `work_dir`.
    ///
    /// The environment is the parent's when `inherit_environment` is set,
    /// plus [`DIR_VARIABLE`] pointing at `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::EmptyCommand`] when `argv` is empty.
    pub fn new(
        argv: Vec<String>,
        work_dir: &Path,
        inherit_environment: bool,
    ) -> Result<Self, ExecError> {
        if argv.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        let mut env: Vec<(String, String)> = if inherit_environment {
            std::env::vars().filter(|(key, _)| key != DIR_VARIABLE).collect()
        } else {
            Vec::new()
        };
        env.push((
            DIR_VARIABLE.to_owned(),
            work_dir.to_string_lossy().into_owned(),
        ));
        Ok(Self {
            argv,
            work_dir: work_dir.to_path_buf(),
            env,
            chunk_size: 8192,
            streams: Default::default(),
            state: State::Idle,
        })
    }

    /// Sets the largest chunk copied from an output pipe per write.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Short name of the program, used in labels and logs.
    #[must_use]
    pub fn name(&self) -> String {
        self.argv
            .first()
            .map_or_else(String::new, |program| program_name(program))
    }

    fn program(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }

    fn spawn_child(&self) -> Result<Child, ExecError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(ExecError::EmptyCommand);
        };
        debug!(
            target: OS_TARGET,
            program = %program,
            args = ?args,
            work_dir = %self.work_dir.display(),
            "spawning process"
        );
        Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .env_clear()
            .envs(self.env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::spawn(program, source))
    }

    fn take_streams(&mut self) -> Result<Endpoints, ExecError> {
        if let Some(fd) = self.streams.iter().position(Option::is_none) {
            return Err(ExecError::NoFd { fd });
        }
        match std::mem::take(&mut self.streams) {
            [
                Some(Stream::Reader(input)),
                Some(Stream::Writer(output)),
                Some(Stream::Writer(errors)),
            ] => Ok((input, output, errors)),
            _ => Err(ExecError::Direction { fd: 0 }),
        }
    }
}

impl Process for OsProcess {
    fn args(&self) -> Vec<String> {
        self.argv.clone()
    }

    fn env(&self) -> Vec<String> {
        self.env
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }

    fn fd(&self, fd: usize) -> Result<Option<StreamKind>, ExecError> {
        StreamKind::expected_for(fd)?;
        Ok(self
            .streams
            .get(fd)
            .and_then(|slot| slot.as_ref().map(Stream::kind)))
    }

    fn redir(&mut self, fd: usize, stream: Stream) -> Result<(), ExecError> {
        let expected = StreamKind::expected_for(fd)?;
        if !matches!(self.state, State::Idle) {
            return Err(ExecError::AlreadyStarted {
                program: self.program().to_owned(),
            });
        }
        if stream.kind() != expected {
            return Err(ExecError::Direction { fd });
        }
        let slot = self.streams.get_mut(fd).ok_or(ExecError::BadFd { fd })?;
        *slot = Some(stream);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ExecError> {
        if !matches!(self.state, State::Idle) {
            return Err(ExecError::AlreadyStarted {
                program: self.program().to_owned(),
            });
        }
        let endpoints = self.take_streams()?;
        let mut child = self.spawn_child()?;
        let program = self.program().to_owned();
        match attach_workers(&program, &mut child, endpoints, self.chunk_size) {
            Ok(workers) => {
                debug!(target: OS_TARGET, program = %program, pid = child.id(), "process started");
                self.state = State::Running { child, workers };
                Ok(())
            }
            Err(error) => {
                abandon(&program, &mut child);
                Err(error)
            }
        }
    }

    fn wait(&mut self) -> Result<ExitStatus, ExecError> {
        let program = self.program().to_owned();
        let State::Running { mut child, workers } =
            std::mem::replace(&mut self.state, State::Finished)
        else {
            return Err(ExecError::NotStarted { program });
        };
        let status = child.wait().map_err(|source| ExecError::Wait {
            program: program.clone(),
            source: Arc::new(source),
        })?;
        let mut first_failure = None;
        for (fd, worker) in workers {
            let failure = match worker.join() {
                Ok(Ok(())) => None,
                Ok(Err(source)) => Some(ExecError::stream(&program, fd, source)),
                Err(_) => Some(ExecError::worker(&program, format!("stream {fd} copier panicked"))),
            };
            if let Some(error) = failure {
                warn!(target: OS_TARGET, program = %program, fd, %error, "stream copy failed");
                first_failure.get_or_insert(error);
            }
        }
        debug!(target: OS_TARGET, program = %program, %status, "process exited");
        first_failure.map_or(Ok(ExitStatus::from(status)), Err)
    }
}

impl Drop for OsProcess {
    /// Kills and reaps a child that was started but never waited for.
    fn drop(&mut self) {
        if let State::Running { child, .. } = &mut self.state {
            let program = self.argv.first().map_or("", String::as_str);
            abandon(program, child);
        }
    }
}

type Endpoints = (Box<dyn Read + Send>, Box<dyn Write + Send>, Box<dyn Write + Send>);

/// Starts the stdin feeder and the two output pumps for `child`.
///
/// Workers already running when a later one fails are left detached; they
/// finish once the child is gone and its pipes close.
fn attach_workers(
    program: &str,
    child: &mut Child,
    (input, output, errors): Endpoints,
    chunk_size: usize,
) -> Result<Vec<(usize, JoinHandle<io::Result<()>>)>, ExecError> {
    let pipes_missing =
        |fd: usize| ExecError::stream(program, fd, io::Error::other("pipe was not captured"));
    let child_stdin = child.stdin.take().ok_or_else(|| pipes_missing(0))?;
    let child_stdout = child.stdout.take().ok_or_else(|| pipes_missing(1))?;
    let child_stderr = child.stderr.take().ok_or_else(|| pipes_missing(2))?;
    Ok(vec![
        (0, spawn_worker(program, 0, move || feed(input, child_stdin))?),
        (
            1,
            spawn_worker(program, 1, move || pump(child_stdout, output, chunk_size))?,
        ),
        (
            2,
            spawn_worker(program, 2, move || pump(child_stderr, errors, chunk_size))?,
        ),
    ])
}

/// Kills `child` and reaps it so no zombie outlives its owner.
fn abandon(program: &str, child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(target: OS_TARGET, program = %program, %err, "kill failed");
    }
    match child.wait() {
        Ok(status) => debug!(target: OS_TARGET, program = %program, %status, "abandoned process reaped"),
        Err(err) => warn!(target: OS_TARGET, program = %program, %err, "abandoned process not reaped"),
    }
}

fn spawn_worker<F>(program: &str, fd: usize, work: F) -> Result<JoinHandle<io::Result<()>>, ExecError>
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{program}-fd{fd}"))
        .spawn(work)
        .map_err(|err| ExecError::worker(program, err.to_string()))
}

/// Copies the whole payload into the child's stdin, then closes it.
///
/// A child that exits without reading its input is not an error.
fn feed(mut input: Box<dyn Read + Send>, mut stdin: impl Write) -> io::Result<()> {
    match io::copy(&mut input, &mut stdin) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err),
    }
}

/// Forwards a child output pipe to `sink`, one `write_all` per chunk read.
fn pump(mut pipe: impl Read, mut sink: Box<dyn Write + Send>, chunk_size: usize) -> io::Result<()> {
    let mut chunk = vec![0; chunk_size];
    loop {
        match pipe.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let bytes = chunk.get(..n).unwrap_or_default();
                sink.write_all(bytes)?;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    sink.flush()
}
