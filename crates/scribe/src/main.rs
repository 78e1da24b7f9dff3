use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<_> = std::env::args_os().collect();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match scribe::run_editor(&args, scribe::current_dir(), stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr();
            let _ = writeln!(stderr, "scribe: {error}");
            ExitCode::FAILURE
        }
    }
}
