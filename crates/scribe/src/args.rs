//! Separation of configuration flags from the files to open.
//!
//! Configuration flags must come first. Everything from the first argument
//! that is not a recognised flag (or its value) onwards names a file.

use std::ffi::{OsStr, OsString};

/// Flags forwarded to the configuration loader.
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--inherit-environment",
    "--stream-chunk-size",
];

/// Result of [`split_arguments`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSplit {
    /// Program name followed by the configuration flags.
    pub config_arguments: Vec<OsString>,
    /// Files to open, in order.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Separator,
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if text == "--" {
        return FlagAction::Separator;
    }
    let (flag, inline) = text
        .split_once('=')
        .map_or((text.as_ref(), false), |(flag, _)| (flag, true));
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline,
        }
    } else {
        FlagAction::Stop
    }
}

/// Splits `args` (program name first) into configuration flags and files.
///
/// A `--` ends the flags explicitly so a file may start with `--`.
///
/// # Examples
///
/// ```
/// use scribe::split_arguments;
///
/// let args: Vec<std::ffi::OsString> = ["scribe", "--log-filter", "debug", "notes.txt"]
///     .into_iter()
///     .map(Into::into)
///     .collect();
/// let split = split_arguments(&args);
/// assert_eq!(split.config_arguments.len(), 3);
/// assert_eq!(split.files, ["notes.txt"]);
/// ```
#[must_use]
pub fn split_arguments(args: &[OsString]) -> ArgumentSplit {
    let mut iter = args.iter();
    let Some(program) = iter.next() else {
        return ArgumentSplit::default();
    };
    let mut config_arguments = vec![program.clone()];
    let mut files = Vec::new();
    let mut pending_value = false;
    let mut flags_done = false;
    for argument in iter {
        if flags_done {
            files.push(argument.to_string_lossy().into_owned());
            continue;
        }
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match classify(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Separator => flags_done = true,
            FlagAction::Stop => {
                flags_done = true;
                files.push(argument.to_string_lossy().into_owned());
            }
        }
    }
    ArgumentSplit {
        config_arguments,
        files,
    }
}
