//! Line-oriented editing session used by the `scribe` binary.
//!
//! Each input line is one command, dispatched with the active tag as its
//! destination. A line starting with `:` focuses the tag with that label, and
//! a lone `:` prints the active tag's body.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use scribe_exec::{ProcessFactory, ProcessHandle};
use scribe_workspace::{Column, Tag, TargetRef, UiContext, Window, Workspace};

use crate::dispatch::{BuiltinVerb, CommandEvent, CommandRouter, Outcome};
use crate::paths::abs_of;
use crate::workbench::Workbench;

const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// Prefix of focus-changing lines.
pub const FOCUS_PREFIX: char = ':';

/// An open workspace plus the router commands go through.
pub struct Session<W, F> {
    router: CommandRouter<W, F>,
    ctx: UiContext,
    cwd: PathBuf,
    handles: Vec<ProcessHandle>,
}

impl<W, F> Session<W, F>
where
    W: Workbench,
    F: ProcessFactory,
{
    /// Opens `files` relative to `cwd`, one tag each in a single column.
    ///
    /// Unreadable files open empty. With no files a tag for `cwd` itself is
    /// opened. The first tag gets focus.
    pub fn open(router: CommandRouter<W, F>, cwd: impl Into<PathBuf>, files: &[String]) -> Self {
        let dir: PathBuf = cwd.into();
        let label = dir.to_string_lossy().into_owned();
        let workspace = Workspace::new(label.clone());
        let column = Column::new(label.clone());
        if files.is_empty() {
            column.push(Tag::new(label));
        }
        for file in files {
            let path = abs_of(&dir, file);
            let body = fs::read(&path).map(Window::with_text).unwrap_or_default();
            column.push(Tag::with_body(path.to_string_lossy(), body));
        }
        workspace.push(column.clone());
        let first = column.tags().into_iter().next();
        let mut ctx = UiContext::new(workspace);
        ctx.focus(Some(column), first);
        Self {
            router,
            ctx,
            cwd: dir,
            handles: Vec::new(),
        }
    }

    /// The focus state commands are dispatched against.
    pub const fn context(&self) -> &UiContext {
        &self.ctx
    }

    /// The router commands go through.
    pub const fn router(&self) -> &CommandRouter<W, F> {
        &self.router
    }

    /// Runs one input line. Returns `false` once `Exit` has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns any failure writing to `output`.
    pub fn execute<O: Write>(&mut self, line: &str, output: &mut O) -> io::Result<bool> {
        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            return Ok(true);
        }
        if let Some(label) = text.strip_prefix(FOCUS_PREFIX) {
            self.focus(label, output)?;
            return Ok(true);
        }
        let event = self.event(text);
        match self.router.dispatch(event, &mut self.ctx) {
            Outcome::Rejected(error) => writeln!(output, "?{error}")?,
            Outcome::Started(handle) => self.handles.push(handle),
            Outcome::Builtin(BuiltinVerb::Exit) => return Ok(false),
            Outcome::Builtin(_) | Outcome::Edited { .. } | Outcome::Installed => {}
        }
        Ok(true)
    }

    /// Executes lines from `input` until `Exit` or end of input, then waits
    /// for every started process and prints its result buffer.
    ///
    /// # Errors
    ///
    /// Returns any failure reading `input` or writing `output`.
    pub fn run<R: BufRead, O: Write>(mut self, input: R, output: &mut O) -> io::Result<()> {
        for line in input.lines() {
            if !self.execute(&line?, output)? {
                break;
            }
        }
        self.finish(output)
    }

    /// Joins outstanding processes and prints each result buffer once.
    ///
    /// # Errors
    ///
    /// Returns any failure writing to `output`.
    pub fn finish<O: Write>(&mut self, output: &mut O) -> io::Result<()> {
        let mut printed: Vec<String> = Vec::new();
        for handle in self.handles.drain(..) {
            let label = handle.label().to_owned();
            if let Err(error) = handle.join() {
                writeln!(output, "?{label}: {error}")?;
            }
            if !printed.contains(&label) {
                printed.push(label);
            }
        }
        info!(target: SESSION_TARGET, results = printed.len(), "session finished");
        for label in printed {
            let Some(tag) = self.ctx.workspace().find_tag(&label) else {
                continue;
            };
            writeln!(output, "{label}:")?;
            output.write_all(tag.body().text().as_bytes())?;
            writeln!(output)?;
        }
        output.flush()
    }

    fn focus<O: Write>(&mut self, label: &str, output: &mut O) -> io::Result<()> {
        let wanted = label.trim();
        if wanted.is_empty() {
            return match self.ctx.active_tag() {
                Some(tag) => {
                    output.write_all(tag.body().text().as_bytes())?;
                    writeln!(output)
                }
                None => writeln!(output, "?no active tag"),
            };
        }
        let found = self
            .ctx
            .workspace()
            .find_tag(wanted)
            .or_else(|| self.ctx.workspace().find_tag(&self.absolute(wanted)));
        match found {
            Some(tag) => {
                debug!(target: SESSION_TARGET, label = wanted, "focus moved");
                self.ctx.focus_tag(tag);
                Ok(())
            }
            None => writeln!(output, "?no tag {wanted}"),
        }
    }

    fn absolute(&self, name: &str) -> String {
        abs_of(&self.cwd, name).to_string_lossy().into_owned()
    }

    /// Builds the event for `text` as if typed into the active tag's strip.
    fn event(&self, text: &str) -> CommandEvent {
        let Some(tag) = self.ctx.active_tag() else {
            return CommandEvent::new(text).with_origin(self.cwd.clone(), "");
        };
        CommandEvent::new(text)
            .with_destination(TargetRef::Window(tag.strip().clone()))
            .with_origin(self.cwd.clone(), tag.label())
    }
}

/// Current directory, falling back to `.` when it cannot be determined.
#[must_use]
pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}
