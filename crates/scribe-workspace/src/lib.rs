//! Editable buffers and the workspace tree commands are resolved against.
//!
//! The tree is strictly hierarchical: a [`Workspace`] owns [`Column`]s, a
//! column owns [`Tag`]s, and a tag owns a body [`Window`]. Every node is a
//! cheap, cloneable handle, so a [`TargetRef`] can name any node without
//! borrowing the tree and never outlives what it refers to.
//!
//! [`UiContext`] records which column and tag hold focus. It is threaded
//! through command dispatch instead of living in global state.

mod buffer;
mod column;
mod context;
mod tag;
mod target;
mod window;

pub use buffer::{EditableBuffer, TextBuffer};
pub use column::{Column, Workspace};
pub use context::UiContext;
pub use tag::{Tag, TagId};
pub use target::{SharedEditor, TargetRef};
pub use window::{Window, WindowId};
