//! Path helpers for command origins.

use std::path::{Path, PathBuf};

/// Absolute name of `name` as seen from `dir`.
///
/// Absolute names pass through; relative ones are joined onto `dir`. An empty
/// name refers to `dir` itself.
#[must_use]
pub fn abs_of(dir: &Path, name: &str) -> PathBuf {
    if name.is_empty() {
        return dir.to_path_buf();
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        dir.join(candidate)
    }
}

/// Directory a command issued from `path` runs in.
///
/// An existing directory is its own answer; anything else resolves to its
/// parent, and to `.` when there is no parent.
#[must_use]
pub fn dir_of(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case::relative("/src", "main.c", "/src/main.c")]
    #[case::absolute("/src", "/etc/hosts", "/etc/hosts")]
    #[case::empty("/src", "", "/src")]
    fn joins_names_onto_directories(#[case] dir: &str, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(abs_of(Path::new(dir), name), PathBuf::from(expected));
    }

    #[test]
    fn existing_directories_are_their_own_dir() {
        let dir = TempDir::new().expect("temp dir");
        assert_eq!(dir_of(dir.path()), dir.path());
    }

    #[test]
    fn files_resolve_to_their_parent() {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("notes.txt");
        assert_eq!(dir_of(&file), dir.path());
    }

    #[test]
    fn bare_names_resolve_to_the_current_directory() {
        assert_eq!(dir_of(Path::new("scribe-no-such-file")), PathBuf::from("."));
    }
}
