//! Command dispatch and process execution for the scribe editor.
//!
//! Commands arrive as [`CommandEvent`]s and go through a [`CommandRouter`].
//! Built-in verbs are delegated to a [`Workbench`], `Edit` scripts run
//! against the windows their destination reaches, `Install` specs are
//! recorded on the active tag, and every other command line becomes an
//! external process. The process reads the selection of the active body and
//! streams both output channels into a result buffer labelled
//! `<dir>/<name>-<dir>`.
//!
//! Failures never escape the router: each is reported through a
//! [`Reporter`] and returned as [`Outcome::Rejected`], so the editor keeps
//! accepting commands.
//!
//! The `scribe` binary drives a [`Session`] over standard input with the
//! in-memory [`HeadlessWorkbench`], which implements every built-in without
//! a display.

mod args;
mod bootstrap;
mod dispatch;
mod headless;
mod launch;
mod paths;
mod report;
mod session;
pub mod telemetry;
mod workbench;

pub use args::{ArgumentSplit, CONFIG_CLI_FLAGS, split_arguments};
pub use bootstrap::{
    ArgsConfigLoader, BootstrapError, Bootstrapped, ConfigLoader, StaticConfigLoader,
    bootstrap_with,
};
pub use dispatch::{
    BuiltinVerb, CommandEvent, CommandRouter, DispatchError, EDIT_PREFIX, INSTALL_PREFIX, Outcome,
    Resolution, Verb, cmdexec, resolve,
};
pub use headless::{ColumnLayout, FONT_FACES, HeadlessWorkbench, Layout};
pub use launch::{DUMP_FILE, LaunchError, run_editor};
pub use paths::{abs_of, dir_of};
pub use report::{Reporter, StructuredReporter};
pub use session::{FOCUS_PREFIX, Session, current_dir};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use workbench::{Workbench, WorkbenchError};

#[cfg(test)]
mod tests;
