//! sysexec binary entry point.

use std::process::ExitCode;

use sysexec::cli::{self, Args};
use sysexec::config::Config;
use sysexec::{logging, CommandExecutor};
use tracing::{debug, error};

/// Exit status for argument and configuration errors.
const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Try 'sysexec --help' for more information.");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    run(&args)
}

fn run(args: &Args) -> ExitCode {
    let config = match Config::load(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let _ = logging::try_init_with(Some(config.log_filter()));

    let command = match args.command() {
        Ok(command) => command,
        Err(err) => {
            error!(error = %err, "invalid invocation");
            eprintln!("error: {err}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let executor = CommandExecutor::new(config.executor_config());
    debug!(command = %command.label(), "running command");

    if executor.execute(&command) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
