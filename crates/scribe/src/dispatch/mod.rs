//! Command dispatch: routing, destination resolution and process execution.
//!
//! A [`CommandEvent`] is classified by [`Verb::parse`]:
//!
//! - exact built-in names go to the [`Workbench`](crate::Workbench);
//! - `Edit ` scripts are compiled and resolved against the first
//!   destination, fanning out over columns and workspaces;
//! - `Install ` specs are handed to the workbench with the active tag;
//! - anything else is an external command line run by [`cmdexec`] with the
//!   active body's selection as input.

mod errors;
mod event;
mod exec;
mod resolve;
mod router;
mod verb;

pub use self::errors::DispatchError;
pub use self::event::CommandEvent;
pub use self::exec::cmdexec;
pub use self::resolve::{Resolution, resolve};
pub use self::router::{CommandRouter, Outcome};
pub use self::verb::{BuiltinVerb, EDIT_PREFIX, INSTALL_PREFIX, Verb};
