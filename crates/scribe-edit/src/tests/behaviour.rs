//! Behaviour-driven tests for edit scripts.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use scribe_workspace::{EditableBuffer, TextBuffer};

use crate::{CompileError, Options, RunError, Script, compile};

#[derive(Default)]
struct TestWorld {
    buffer: TextBuffer,
    compiled: Option<Result<(), CompileError>>,
    outcome: Option<Result<(), RunError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

/// Feature files write newlines as `\n`.
fn unquote(text: &str) -> String {
    text.trim_matches('"').replace("\\n", "\n")
}

#[given("a buffer containing {text}")]
fn given_buffer(world: &mut TestWorld, text: String) {
    world.buffer = TextBuffer::from_bytes(unquote(&text));
}

#[when("the script {script} is run")]
fn when_run(world: &mut TestWorld, script: String) {
    let program = compile(script.trim_matches('"'), &Options::default()).expect("compile");
    world.outcome = Some(program.run(&mut world.buffer));
}

#[when("the script {script} is compiled")]
fn when_compiled(world: &mut TestWorld, script: String) {
    world.compiled = Some(compile(script.trim_matches('"'), &Options::default()).map(|_| ()));
}

#[then("the buffer contains {text}")]
fn then_contains(world: &mut TestWorld, text: String) {
    assert_eq!(world.buffer.to_string_lossy(), unquote(&text));
}

#[then("the selection covers bytes {q0} to {q1}")]
fn then_selection(world: &mut TestWorld, q0: usize, q1: usize) {
    assert_eq!(world.buffer.dot(), (q0, q1));
}

#[then("the run fails with {kind}")]
fn then_run_fails(world: &mut TestWorld, kind: String) {
    let err = world
        .outcome
        .as_ref()
        .expect("no run captured")
        .as_ref()
        .expect_err("expected a run error");
    match kind.as_str() {
        "no_match" => assert!(matches!(err, RunError::NoMatch { .. }), "got {err}"),
        "out_of_range" => assert!(matches!(err, RunError::OutOfRange { .. }), "got {err}"),
        other => panic!("unsupported error kind: '{other}'"),
    }
}

#[then("compilation fails")]
fn then_compilation_fails(world: &mut TestWorld) {
    let compiled = world.compiled.as_ref().expect("no compilation captured");
    assert!(compiled.is_err(), "expected a compile error");
}

#[scenario(path = "tests/features/edit_scripts.feature")]
fn edit_script_behaviour(world: TestWorld) {
    let _ = world;
}
