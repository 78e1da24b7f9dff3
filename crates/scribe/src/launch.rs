//! Entry point wiring configuration, telemetry and the session together.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use scribe_exec::OsProcessFactory;

use crate::args::split_arguments;
use crate::bootstrap::{ArgsConfigLoader, BootstrapError, bootstrap_with};
use crate::dispatch::CommandRouter;
use crate::headless::HeadlessWorkbench;
use crate::report::StructuredReporter;
use crate::session::Session;

const LAUNCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::launch");

/// File `Dump` and `Load` use, relative to the starting directory.
pub const DUMP_FILE: &str = "scribe.dump";

/// Errors that end an editing session.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration or telemetry could not be set up.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// Reading commands or writing results failed.
    #[error("session I/O failed: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Runs an editing session over `input` and `output`.
///
/// `args` is the full command line, program name first. Configuration flags
/// precede the files to open, which are resolved against `cwd`.
///
/// # Errors
///
/// Returns [`LaunchError::Bootstrap`] when configuration or telemetry fails
/// and [`LaunchError::Io`] when the session streams fail.
pub fn run_editor<R, O>(
    args: &[OsString],
    cwd: PathBuf,
    input: R,
    output: &mut O,
) -> Result<(), LaunchError>
where
    R: BufRead,
    O: Write,
{
    let split = split_arguments(args);
    let loader = ArgsConfigLoader::new(split.config_arguments);
    let bootstrapped = bootstrap_with(&loader, Arc::new(StructuredReporter::new()))?;
    let config = bootstrapped.config();
    let factory = OsProcessFactory::new(config.inherit_environment(), config.stream_chunk_size());
    let workbench = HeadlessWorkbench::new(cwd.join(DUMP_FILE));
    let router = CommandRouter::new(workbench, factory, bootstrapped.reporter());
    info!(
        target: LAUNCH_TARGET,
        files = split.files.len(),
        cwd = %cwd.display(),
        "session opening"
    );
    Session::open(router, cwd, &split.files)
        .run(input, output)
        .map_err(|source| LaunchError::Io { source })
}
