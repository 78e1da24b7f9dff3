//! Running external commands into result buffers.

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use scribe_exec::{
    ExecError, Funnel, ProcessFactory, ProcessHandle, Startable, Stream, command_label,
};
use scribe_workspace::{EditableBuffer, UiContext, Window};

use super::router::DISPATCH_TARGET;
use crate::workbench::Workbench;

/// Runs `argv` in `work_dir`, feeding it the selection of `source`.
///
/// Output from both standard output and standard error is appended to the
/// result buffer labelled by [`command_label`], whose current selection is
/// deleted first. The process is reaped on a background thread; the returned
/// handle joins it.
///
/// # Errors
///
/// Returns the error from creating, redirecting or starting the process.
pub fn cmdexec<W, F>(
    workbench: &mut W,
    factory: &F,
    ctx: &UiContext,
    source: Option<&Window>,
    work_dir: &Path,
    argv: &[String],
) -> Result<ProcessHandle, ExecError>
where
    W: Workbench + ?Sized,
    F: ProcessFactory + ?Sized,
{
    let payload = source.map(|window| window.lock().selected()).unwrap_or_default();
    let (name, process) = factory.create(argv, work_dir)?;
    let label = command_label(&name, &work_dir.to_string_lossy());
    debug!(
        target: DISPATCH_TARGET,
        label = %label,
        input_bytes = payload.len(),
        "preparing external command"
    );

    let result = workbench.find_or_create(ctx, work_dir, &label);
    {
        let mut body = result.lock();
        let (q0, q1) = body.dot();
        body.delete(q0, q1);
    }

    let funnel = Funnel::new(result.shared());
    let running = Startable::bind(
        name,
        process,
        Stream::reader(Cursor::new(payload)),
        Stream::writer(funnel.clone()),
        Stream::writer(funnel),
    )?
    .start()?;
    ProcessHandle::spawn(label, running)
}
