//! Test suites for the scribe dispatch core.

mod session;
pub(crate) mod support;
