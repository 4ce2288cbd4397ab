//! `writer <file> <string>`: write a string to a file.

use std::process::ExitCode;

use sysexec::{logging, writer};

fn main() -> ExitCode {
    let _ = logging::try_init();

    match writer::run(std::env::args_os()) {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
