//! Execution tests for compiled scripts.

use rstest::rstest;
use scribe_workspace::{EditableBuffer, TextBuffer};

use crate::{Options, RunError, Script, compile};

mod behaviour;

fn run(script: &str, text: &str) -> (TextBuffer, Result<(), RunError>) {
    let program = compile(script, &Options::with_origin("/tmp")).expect("compile");
    let mut buffer = TextBuffer::from_bytes(text);
    let result = program.run(&mut buffer);
    (buffer, result)
}

#[rstest]
#[case::append_at_end("$a/!/", "hello", "hello!", (5, 6))]
#[case::insert_at_start("#0i/>> /", "hello", ">> hello", (0, 3))]
#[case::change_whole(",c/bye/", "hello", "bye", (0, 3))]
#[case::delete_line("2d", "one\ntwo\nthree\n", "one\nthree\n", (4, 4))]
#[case::substitute_first(",s/o/0/", "foo boo", "f0o boo", (0, 7))]
#[case::substitute_global(",s/o/0/g", "foo boo", "f00 b00", (0, 7))]
#[case::loop_changes_each(",x/cat/ c/dog/", "cat, cat", "dog, dog", (0, 8))]
#[case::loop_shrinks_range(",x/ab/ d", "ab-ab-", "--", (0, 2))]
#[case::pattern_then_print("/two/p", "one two", "one two", (4, 7))]
#[case::sequence("1d; $a/tail\\n/", "head\nbody\n", "body\ntail\n", (5, 10))]
fn applies_scripts(
    #[case] script: &str,
    #[case] input: &str,
    #[case] expected: &str,
    #[case] dot: (usize, usize),
) {
    let (buffer, result) = run(script, input);
    result.expect("run");
    assert_eq!(buffer.to_string_lossy(), expected);
    assert_eq!(buffer.dot(), dot);
}

#[test]
fn substitution_without_match_is_not_an_error() {
    let (buffer, result) = run(",s/zzz/y/", "abc");
    result.expect("run");
    assert_eq!(buffer.to_string_lossy(), "abc");
}

#[test]
fn pattern_search_wraps_past_the_end() {
    let program = compile("/a/p", &Options::default()).expect("compile");
    let mut buffer = TextBuffer::from_bytes("a b a");
    buffer.select(5, 5);
    program.run(&mut buffer).expect("run");
    assert_eq!(buffer.dot(), (0, 1));
}

#[test]
fn pattern_search_starts_after_dot() {
    let program = compile("/a/p", &Options::default()).expect("compile");
    let mut buffer = TextBuffer::from_bytes("a b a");
    buffer.select(0, 1);
    program.run(&mut buffer).expect("run");
    assert_eq!(buffer.dot(), (4, 5));
}

#[rstest]
#[case::byte_past_end("#10d", RunError::OutOfRange { address: "#10".into(), len: 3 })]
#[case::line_past_end("5d", RunError::OutOfRange { address: "5".into(), len: 3 })]
#[case::no_match("/q/d", RunError::NoMatch { pattern: "q".into() })]
#[case::reversed("#2,#1d", RunError::OutOfOrder { q0: 2, q1: 1 })]
fn reports_run_errors(#[case] script: &str, #[case] expected: RunError) {
    let (buffer, result) = run(script, "abc");
    assert_eq!(result.expect_err("should fail"), expected);
    assert_eq!(buffer.to_string_lossy(), "abc");
}

#[test]
fn earlier_commands_stay_applied_after_a_failure() {
    let (buffer, result) = run("$a/!/; /q/d", "abc");
    assert!(matches!(result, Err(RunError::NoMatch { .. })));
    assert_eq!(buffer.to_string_lossy(), "abc!");
}

#[test]
fn line_zero_is_the_start_of_the_buffer() {
    let (buffer, result) = run("0a/top\\n/", "body\n");
    result.expect("run");
    assert_eq!(buffer.to_string_lossy(), "top\nbody\n");
}

#[test]
fn one_program_runs_against_many_buffers() {
    let program = compile(",s/x/y/g", &Options::with_origin("/src")).expect("compile");
    let mut first = TextBuffer::from_bytes("xx");
    let mut second = TextBuffer::from_bytes("axa");
    program.run(&mut first).expect("first");
    program.run(&mut second).expect("second");
    assert_eq!(first.to_string_lossy(), "yy");
    assert_eq!(second.to_string_lossy(), "aya");
    assert_eq!(program.options().origin, "/src");
}
