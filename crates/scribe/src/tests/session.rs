//! Line-oriented session behaviour.

use std::fs;
use std::io::Cursor;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use scribe_exec::OsProcessFactory;

use super::support::RecordingReporter;
use crate::dispatch::CommandRouter;
use crate::headless::HeadlessWorkbench;
use crate::session::Session;

type HeadlessSession = Session<HeadlessWorkbench, OsProcessFactory>;

struct Desk {
    dir: TempDir,
    reporter: Arc<RecordingReporter>,
}

impl Desk {
    fn open(&self, files: &[&str]) -> HeadlessSession {
        let router = CommandRouter::new(
            HeadlessWorkbench::new(self.dir.path().join("layout.json")),
            OsProcessFactory::new(true, 64),
            Arc::clone(&self.reporter) as _,
        );
        let names: Vec<String> = files.iter().map(|name| (*name).to_owned()).collect();
        Session::open(router, self.dir.path(), &names)
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).expect("write");
    }

    fn run(&self, files: &[&str], script: &str) -> String {
        let mut output = Vec::new();
        self.open(files)
            .run(Cursor::new(script.to_owned()), &mut output)
            .expect("session runs");
        String::from_utf8(output).expect("utf-8 output")
    }
}

#[fixture]
fn desk() -> Desk {
    Desk {
        dir: TempDir::new().expect("temp dir"),
        reporter: Arc::new(RecordingReporter::default()),
    }
}

#[rstest]
fn files_open_as_tags_with_the_first_focused(desk: Desk) {
    desk.write("a.txt", "first");
    let session = desk.open(&["a.txt", "missing.txt"]);

    let tags = session.context().workspace().columns()[0].tags();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].body().text(), "first");
    assert!(tags[1].body().text().is_empty());
    assert!(session.context().active_tag().expect("focus").same(&tags[0]));
}

#[rstest]
fn no_files_open_the_directory(desk: Desk) {
    let session = desk.open(&[]);
    let tag = session.context().active_tag().expect("focus").clone();
    assert_eq!(tag.label(), desk.dir.path().to_string_lossy());
}

#[rstest]
fn edits_apply_to_the_focused_body(desk: Desk) {
    desk.write("a.txt", "one two");
    let output = desk.run(&["a.txt"], "Edit ,s/two/three/\n:\n");
    assert_eq!(output, "one three\n");
}

#[rstest]
fn focus_lines_switch_tags(desk: Desk) {
    desk.write("a.txt", "alpha");
    desk.write("b.txt", "beta");
    let output = desk.run(&["a.txt", "b.txt"], ":b.txt\n:\n:nowhere\n");
    assert_eq!(output, "beta\n?no tag nowhere\n");
}

#[rstest]
fn rejected_commands_are_echoed_with_a_question_mark(desk: Desk) {
    let output = desk.run(&["a.txt"], "Edit ,q\n");
    assert!(output.starts_with("?bad edit script"), "got {output:?}");
    assert_eq!(desk.reporter.failures(), ["compile"]);
}

#[rstest]
fn put_saves_the_focused_file(desk: Desk) {
    desk.write("a.txt", "old");
    desk.run(&["a.txt"], "Edit ,c/new/\nPut\n");
    assert_eq!(
        fs::read_to_string(desk.dir.path().join("a.txt")).expect("read"),
        "new"
    );
}

#[rstest]
fn exit_prints_every_result_buffer(desk: Desk) {
    desk.write("a.txt", "pear\napple\n");
    let output = desk.run(&["a.txt"], "Edit ,p\nsort\nExit\nEdit ,d\n");

    let dir = desk.dir.path().to_string_lossy().into_owned();
    let label = scribe_exec::command_label("sort", &dir);
    assert_eq!(output, format!("{label}:\napple\npear\n\n"));
    assert_eq!(
        fs::read_to_string(desk.dir.path().join("a.txt")).expect("read"),
        "pear\napple\n"
    );
}

#[rstest]
fn end_of_input_also_joins_processes(desk: Desk) {
    let output = desk.run(&[], "echo done\n");
    assert!(output.ends_with("done\n\n"), "got {output:?}");
}
