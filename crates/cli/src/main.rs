use std::process::ExitCode;

fn main() -> ExitCode {
    deskmatch_cli::run()
}
