//! Classification of command text.

use strum::{Display, EnumIter, EnumString};

/// Prefix introducing an edit script.
pub const EDIT_PREFIX: &str = "Edit ";

/// Prefix introducing a command installed onto the active tag.
pub const INSTALL_PREFIX: &str = "Install ";

/// Commands the workbench implements itself.
///
/// Names match command text exactly and case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum BuiltinVerb {
    /// Open an image viewer on the selection.
    Img,
    /// Restore a dumped layout.
    Load,
    /// Save the layout.
    Dump,
    /// Toggle elastic tabstops.
    Elastic,
    /// Cycle the font face.
    Font,
    /// Write the active body to its file.
    Put,
    /// Reload the active body from its file.
    Get,
    /// Open a new tag.
    New,
    /// Open a new column.
    Newcol,
    /// Close the active tag.
    Del,
    /// Sort the active column's tags.
    Sort,
    /// Close the active column.
    Delcol,
    /// Leave the editor.
    Exit,
}

/// What a line of command text asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb<'a> {
    /// A built-in command.
    Builtin(BuiltinVerb),
    /// An edit script, without its prefix.
    Edit(&'a str),
    /// A command to install, without its prefix.
    Install(&'a str),
    /// A command line for an external program.
    External(&'a str),
}

impl<'a> Verb<'a> {
    /// Classifies `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe::{BuiltinVerb, Verb};
    ///
    /// assert_eq!(Verb::parse("Put"), Verb::Builtin(BuiltinVerb::Put));
    /// assert_eq!(Verb::parse("Edit ,d"), Verb::Edit(",d"));
    /// assert_eq!(Verb::parse("put"), Verb::External("put"));
    /// ```
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        if let Ok(verb) = text.parse::<BuiltinVerb>() {
            return Self::Builtin(verb);
        }
        if let Some(script) = text.strip_prefix(EDIT_PREFIX) {
            return Self::Edit(script);
        }
        if let Some(spec) = text.strip_prefix(INSTALL_PREFIX) {
            return Self::Install(spec);
        }
        Self::External(text)
    }
}
