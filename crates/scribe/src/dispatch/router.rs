//! Routing of command text to built-ins, edit scripts and external programs.

use std::sync::Arc;

use tracing::debug;

use scribe_edit::{Options, compile};
use scribe_exec::{ProcessFactory, ProcessHandle, parse_command_line};
use scribe_workspace::UiContext;

use super::errors::DispatchError;
use super::event::CommandEvent;
use super::exec::cmdexec;
use super::resolve::resolve;
use super::verb::{BuiltinVerb, Verb};
use crate::paths::{abs_of, dir_of};
use crate::report::Reporter;
use crate::workbench::Workbench;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// What a dispatched command did.
#[derive(Debug)]
pub enum Outcome {
    /// A built-in verb ran.
    Builtin(BuiltinVerb),
    /// An edit script ran; `failures` counts buffers it failed on.
    Edited {
        /// Buffers or references that failed.
        failures: usize,
    },
    /// A command was installed on the active tag.
    Installed,
    /// An external process is running.
    Started(ProcessHandle),
    /// The command was rejected; the error has been reported.
    Rejected(DispatchError),
}

/// Routes commands to the workbench, the edit engine or the OS.
///
/// Every failure is reported through the [`Reporter`] and returned as
/// [`Outcome::Rejected`]; the router stays usable afterwards.
pub struct CommandRouter<W, F> {
    workbench: W,
    factory: F,
    reporter: Arc<dyn Reporter>,
}

impl<W, F> CommandRouter<W, F>
where
    W: Workbench,
    F: ProcessFactory,
{
    /// Creates a router over its collaborators.
    pub const fn new(workbench: W, factory: F, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            workbench,
            factory,
            reporter,
        }
    }

    /// The workbench commands are delegated to.
    pub const fn workbench(&self) -> &W {
        &self.workbench
    }

    /// Mutable access to the workbench.
    pub const fn workbench_mut(&mut self) -> &mut W {
        &mut self.workbench
    }

    /// Dispatches one command.
    pub fn dispatch(&mut self, event: CommandEvent, ctx: &mut UiContext) -> Outcome {
        let text = event.text();
        self.reporter.command_received(text);
        let verb = Verb::parse(text);
        debug!(target: DISPATCH_TARGET, command = text, verb = ?verb, "routing command");
        let result = match verb {
            Verb::Builtin(builtin) => self.builtin(builtin, ctx),
            Verb::Edit(script) => self.edit(&event, script, ctx),
            Verb::Install(spec) => self.install(text, spec, ctx),
            Verb::External(line) => self.external(&event, line, ctx),
        };
        result.unwrap_or_else(|error| {
            self.reporter.command_failed(text, &error);
            Outcome::Rejected(error)
        })
    }

    fn builtin(
        &mut self,
        verb: BuiltinVerb,
        ctx: &mut UiContext,
    ) -> Result<Outcome, DispatchError> {
        self.workbench
            .builtin(verb, ctx)
            .map_err(|source| DispatchError::workbench(verb.to_string(), source))?;
        self.reporter.builtin_completed(verb);
        Ok(Outcome::Builtin(verb))
    }

    fn edit(
        &mut self,
        event: &CommandEvent,
        script: &str,
        ctx: &UiContext,
    ) -> Result<Outcome, DispatchError> {
        let Some(target) = event.destinations().first() else {
            return Err(DispatchError::no_destination(event.text()));
        };
        let abs = abs_of(event.origin_dir(), event.origin_name());
        let options = Options {
            sender: (!event.origin_name().is_empty()).then(|| event.origin_name().to_owned()),
            origin: abs.to_string_lossy().into_owned(),
        };
        let leaf = ctx.resolve_active(target);
        let program = match compile(script, &options) {
            Ok(program) => program,
            Err(source) => {
                // The destination is redrawn even when nothing ran.
                self.workbench.refresh(&leaf);
                return Err(DispatchError::compile(script, source));
            }
        };

        let resolution = resolve(target, ctx, &program, event.text(), &*self.reporter);
        if target.is_leaf_editor() {
            self.workbench.jump(&leaf);
        }
        self.workbench.refresh(&leaf);
        self.reporter.edit_completed(target.kind(), resolution.failures);
        Ok(Outcome::Edited {
            failures: resolution.failures,
        })
    }

    fn install(
        &mut self,
        text: &str,
        spec: &str,
        ctx: &UiContext,
    ) -> Result<Outcome, DispatchError> {
        let tag = ctx
            .active_tag()
            .ok_or_else(|| DispatchError::no_active_tag(text))?;
        self.workbench
            .install(tag, spec)
            .map_err(|source| DispatchError::workbench("Install", source))?;
        Ok(Outcome::Installed)
    }

    fn external(
        &mut self,
        event: &CommandEvent,
        line: &str,
        ctx: &UiContext,
    ) -> Result<Outcome, DispatchError> {
        let argv = parse_command_line(line).map_err(|source| DispatchError::exec(line, source))?;
        if event.destinations().is_empty() {
            return Err(DispatchError::no_destination(line));
        }
        let abs = abs_of(event.origin_dir(), event.origin_name());
        let work_dir = dir_of(&abs);
        let editor = ctx.current_editor();
        let handle = cmdexec(
            &mut self.workbench,
            &self.factory,
            ctx,
            editor.as_ref(),
            &work_dir,
            &argv,
        )
        .map_err(|source| DispatchError::exec(line, source))?;
        self.reporter.process_started(handle.label(), &argv);
        Ok(Outcome::Started(handle))
    }
}
