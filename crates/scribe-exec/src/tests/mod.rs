//! Process contract and OS process tests.

use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use mockall::mock;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{
    DIR_VARIABLE, ExecError, ExitStatus, Funnel, OsProcess, OsProcessFactory, Process,
    ProcessFactory, ProcessHandle, Startable, Stream, StreamKind, command_label,
    parse_command_line,
};


mock! {
    pub Proc {}

    impl Process for Proc {
        fn args(&self) -> Vec<String>;
        fn env(&self) -> Vec<String>;
        fn fd(&self, fd: usize) -> Result<Option<StreamKind>, ExecError>;
        fn redir(&mut self, fd: usize, stream: Stream) -> Result<(), ExecError>;
        fn start(&mut self) -> Result<(), ExecError>;
        fn wait(&mut self) -> Result<ExitStatus, ExecError>;
    }
}

#[fixture]
fn work_dir() -> TempDir {
    TempDir::new().expect("temp dir")
}

type Sink = Arc<Mutex<Vec<u8>>>;

fn sink_text(sink: &Sink) -> String {
    String::from_utf8_lossy(&sink.lock().expect("sink")).into_owned()
}

/// Binds `input` to stdin and one funnel to both outputs.
fn bound(process: OsProcess, input: &str) -> (Startable, Sink) {
    let name = process.name();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));
    let funnel = Funnel::new(Arc::clone(&sink));
    let startable = Startable::bind(
        name,
        Box::new(process),
        Stream::reader(Cursor::new(input.as_bytes().to_vec())),
        Stream::writer(funnel.clone()),
        Stream::writer(funnel),
    )
    .expect("bind");
    (startable, sink)
}

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_owned()).collect()
}

#[rstest]
#[case::simple("cat", vec!["cat"])]
#[case::padded("  sort   -r ", vec!["sort", "-r"])]
#[case::tabs("wc\t-l", vec!["wc", "-l"])]
fn splits_command_lines(#[case] line: &str, #[case] expected: Vec<&str>) {
    assert_eq!(parse_command_line(line).expect("argv"), expected);
}

#[rstest]
#[case::empty("")]
#[case::spaces("   ")]
#[case::mixed(" \t\n ")]
fn rejects_blank_command_lines(#[case] line: &str) {
    assert!(matches!(
        parse_command_line(line),
        Err(ExecError::EmptyCommand)
    ));
}

#[cfg(unix)]
#[rstest]
#[case::plain("cat", "/tmp", "/tmp/cat-/tmp")]
#[case::root("ls", "/", "/ls-/")]
#[case::nested("make", "/src/app", "/src/app/make-/src/app")]
fn labels_result_buffers(#[case] name: &str, #[case] dir: &str, #[case] expected: &str) {
    assert_eq!(command_label(name, dir), expected);
}

#[rstest]
fn redirecting_fd_three_is_rejected(work_dir: TempDir) {
    let mut process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    let err = process
        .redir(3, Stream::writer(io::sink()))
        .expect_err("fd 3");
    assert!(matches!(err, ExecError::BadFd { fd: 3 }));
    assert!(matches!(process.fd(3), Err(ExecError::BadFd { fd: 3 })));
}

#[rstest]
#[case::reader_on_stdout(1, Stream::reader(io::empty()))]
#[case::writer_on_stdin(0, Stream::writer(io::sink()))]
fn redirecting_the_wrong_way_is_rejected(
    work_dir: TempDir,
    #[case] fd: usize,
    #[case] stream: Stream,
) {
    let mut process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    let err = process.redir(fd, stream).expect_err("direction");
    assert!(matches!(err, ExecError::Direction { fd: bad } if bad == fd));
}

#[rstest]
fn starting_with_an_unbound_stream_fails(work_dir: TempDir) {
    let mut process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    process
        .redir(0, Stream::reader(io::empty()))
        .expect("stdin");
    assert_eq!(process.fd(0).expect("fd 0"), Some(StreamKind::Reader));
    assert_eq!(process.fd(1).expect("fd 1"), None);
    assert!(matches!(process.start(), Err(ExecError::NoFd { fd: 1 })));
}

#[rstest]
fn waiting_before_start_fails(work_dir: TempDir) {
    let mut process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    assert!(matches!(process.wait(), Err(ExecError::NotStarted { .. })));
}

#[test]
fn failed_redirection_never_starts_the_process() {
    let mut process = MockProc::new();
    process.expect_redir().with(eq(0), mockall::predicate::always()).returning(|_, _| Ok(()));
    process
        .expect_redir()
        .with(eq(1), mockall::predicate::always())
        .returning(|fd, _| Err(ExecError::BadFd { fd }));
    process.expect_start().times(0);

    let result = Startable::bind(
        "mock",
        Box::new(process),
        Stream::reader(io::empty()),
        Stream::writer(io::sink()),
        Stream::writer(io::sink()),
    );
    assert!(matches!(result, Err(ExecError::BadFd { fd: 1 })));
}

#[test]
fn running_waits_exactly_once() {
    let mut process = MockProc::new();
    process.expect_redir().times(3).returning(|_, _| Ok(()));
    process.expect_start().times(1).returning(|| Ok(()));
    process
        .expect_wait()
        .times(1)
        .returning(|| Ok(ExitStatus::new(Some(0))));

    let running = Startable::bind(
        "mock",
        Box::new(process),
        Stream::reader(io::empty()),
        Stream::writer(io::sink()),
        Stream::writer(io::sink()),
    )
    .expect("bind")
    .start()
    .expect("start");
    assert_eq!(running.name(), "mock");
    assert!(running.wait().expect("wait").success());
}

#[rstest]
fn environment_names_the_work_directory(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["true"]), work_dir.path(), false).expect("process");
    let expected = format!("{DIR_VARIABLE}={}", work_dir.path().display());
    assert_eq!(process.env(), vec![expected]);
}

#[rstest]
fn inherited_environment_keeps_parent_variables(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["true"]), work_dir.path(), true).expect("process");
    let env = process.env();
    assert!(env.iter().any(|entry| entry.starts_with("PATH=")));
    assert_eq!(
        env.iter()
            .filter(|entry| entry.starts_with(&format!("{DIR_VARIABLE}=")))
            .count(),
        1
    );
}

#[rstest]
fn factory_names_processes_by_program(work_dir: TempDir) {
    let factory = OsProcessFactory::new(true, 0);
    let (name, process) = factory
        .create(&argv(&["/bin/echo", "hi"]), work_dir.path())
        .expect("create");
    assert_eq!(name, "echo");
    assert_eq!(process.args(), argv(&["/bin/echo", "hi"]));
    assert!(matches!(
        factory.create(&[], Path::new("/")),
        Err(ExecError::EmptyCommand)
    ));
}

#[cfg(unix)]
#[rstest]
fn cat_echoes_its_input(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    let (startable, sink) = bound(process, "selected text");
    let status = startable.start().expect("start").wait().expect("wait");
    assert!(status.success());
    assert_eq!(sink_text(&sink), "selected text");
}

#[cfg(unix)]
#[rstest]
fn stdout_and_stderr_share_the_funnel(work_dir: TempDir) {
    let process = OsProcess::new(
        argv(&["sh", "-c", "echo out; echo err 1>&2"]),
        work_dir.path(),
        true,
    )
    .expect("process");
    let (startable, sink) = bound(process, "");
    startable.start().expect("start").wait().expect("wait");
    let text = sink_text(&sink);
    assert!(text.contains("out\n"), "missing stdout in {text:?}");
    assert!(text.contains("err\n"), "missing stderr in {text:?}");
    assert_eq!(text.len(), 8);
}

#[cfg(unix)]
#[rstest]
fn commands_run_in_the_work_directory(work_dir: TempDir) {
    let process = OsProcess::new(
        argv(&["/bin/sh", "-c", "printf %s \"$SCRIBE_DIR\""]),
        work_dir.path(),
        false,
    )
    .expect("process");
    let (startable, sink) = bound(process, "");
    startable.start().expect("start").wait().expect("wait");
    assert_eq!(sink_text(&sink), work_dir.path().display().to_string());
}

#[cfg(unix)]
#[rstest]
fn exit_codes_are_reported(work_dir: TempDir) {
    let process =
        OsProcess::new(argv(&["sh", "-c", "exit 3"]), work_dir.path(), true).expect("process");
    let (startable, _) = bound(process, "");
    let status = startable.start().expect("start").wait().expect("wait");
    assert_eq!(status.code(), Some(3));
    assert!(!status.success());
}

#[rstest]
fn missing_programs_are_not_found(work_dir: TempDir) {
    let process = OsProcess::new(
        argv(&["scribe-no-such-program-4f1c"]),
        work_dir.path(),
        true,
    )
    .expect("process");
    let (startable, _) = bound(process, "");
    assert!(matches!(startable.start(), Err(ExecError::NotFound { .. })));
}

#[cfg(unix)]
#[rstest]
fn starting_twice_is_rejected(work_dir: TempDir) {
    let mut process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    process.redir(0, Stream::reader(io::empty())).expect("0");
    process.redir(1, Stream::writer(io::sink())).expect("1");
    process.redir(2, Stream::writer(io::sink())).expect("2");
    process.start().expect("start");
    assert!(matches!(
        process.start(),
        Err(ExecError::AlreadyStarted { .. })
    ));
    assert!(matches!(
        process.redir(0, Stream::reader(io::empty())),
        Err(ExecError::AlreadyStarted { .. })
    ));
    process.wait().expect("wait");
}

#[cfg(unix)]
#[rstest]
fn dropping_an_unwaited_process_kills_it(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["sleep", "30"]), work_dir.path(), true).expect("process");
    let (startable, sink) = bound(process, "");
    let running = startable.start().expect("start");
    drop(running);

    // Both pumps release their funnel once the killed child closes its pipes.
    let deadline = Instant::now() + Duration::from_secs(10);
    while Arc::strong_count(&sink) > 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(Arc::strong_count(&sink), 1);
}

/// Records the size of every write it receives.
#[derive(Clone, Default)]
struct WriteSizes(Arc<Mutex<Vec<usize>>>);

impl Write for WriteSizes {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sizes").push(buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
#[rstest]
fn output_is_copied_in_bounded_chunks(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["cat"]), work_dir.path(), true)
        .expect("process")
        .with_chunk_size(4);
    let sizes = WriteSizes::default();
    let startable = Startable::bind(
        "cat",
        Box::new(process),
        Stream::reader(Cursor::new(b"abcdefghijklmnopqrstuvwxyz".to_vec())),
        Stream::writer(sizes.clone()),
        Stream::writer(io::sink()),
    )
    .expect("bind");
    startable.start().expect("start").wait().expect("wait");
    let recorded = sizes.0.lock().expect("sizes").clone();
    assert_eq!(recorded.iter().sum::<usize>(), 26);
    assert!(recorded.iter().all(|&size| size <= 4), "{recorded:?}");
}

#[cfg(unix)]
#[rstest]
fn handles_reap_on_a_background_thread(work_dir: TempDir) {
    let process = OsProcess::new(argv(&["cat"]), work_dir.path(), true).expect("process");
    let (startable, sink) = bound(process, "background");
    let handle = ProcessHandle::spawn("/tmp/cat-/tmp", startable.start().expect("start"))
        .expect("handle");
    assert_eq!(handle.label(), "/tmp/cat-/tmp");
    assert!(handle.join().expect("join").success());
    assert_eq!(sink_text(&sink), "background");
}
