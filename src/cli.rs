//! Command-line interface for sysexec.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

use crate::execution::{ArgVector, Command};

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `shell <COMMAND>`
    Shell(String),
    /// `exec <PROGRAM> [ARGS]...`
    Exec {
        program: PathBuf,
        args: Vec<OsString>,
    },
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Shell override.
    pub shell: Option<PathBuf>,
    /// File receiving the program's stdout (exec only).
    pub output: Option<PathBuf>,
    /// Requested run, if any.
    pub invocation: Option<Invocation>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Args {
    /// Build the command to run from the parsed arguments.
    pub fn command(&self) -> Result<Command, ArgsError> {
        match &self.invocation {
            None => Err(ArgsError::MissingArgument("MODE")),
            Some(Invocation::Shell(_)) if self.output.is_some() => Err(ArgsError::OutputWithShell),
            Some(Invocation::Shell(line)) => Ok(Command::shell(line.clone())),
            Some(Invocation::Exec { program, .. }) if program.as_os_str().is_empty() => {
                Err(ArgsError::InvalidValue("PROGRAM", String::new()))
            }
            Some(Invocation::Exec { program, args }) => {
                let argv = ArgVector::new(program.clone()).args(args.iter().cloned());
                Ok(match &self.output {
                    Some(output) => Command::redirect(output.clone(), argv),
                    None => Command::direct(argv),
                })
            }
        }
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("shell") => {
                result.shell = Some(parser.value()?.parse()?);
            }
            Short('o') | Long("output") => {
                result.output = Some(parser.value()?.parse()?);
            }
            Value(mode) => {
                let mode = mode.string()?;
                result.invocation = Some(parse_invocation(&mode, &mut parser)?);
                break;
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Everything after the mode word is taken verbatim, dashes included.
fn parse_invocation(mode: &str, parser: &mut lexopt::Parser) -> Result<Invocation, ArgsError> {
    let mut rest = parser.raw_args()?;

    match mode {
        "shell" => {
            let line = rest
                .next()
                .ok_or(ArgsError::MissingArgument("COMMAND"))?
                .into_string()
                .map_err(|v| ArgsError::InvalidValue("COMMAND", v.to_string_lossy().into()))?;
            if let Some(extra) = rest.next() {
                return Err(ArgsError::UnexpectedArgument(
                    extra.to_string_lossy().into(),
                ));
            }
            Ok(Invocation::Shell(line))
        }
        "exec" => {
            let program = rest
                .next()
                .map(PathBuf::from)
                .ok_or(ArgsError::MissingArgument("PROGRAM"))?;
            Ok(Invocation::Exec {
                program,
                args: rest.collect(),
            })
        }
        other => Err(ArgsError::UnknownMode(other.to_string())),
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"sysexec {version}
Run a command through the shell or directly, and report success as the exit status

USAGE:
    sysexec [OPTIONS] shell <COMMAND>
    sysexec [OPTIONS] exec <PROGRAM> [ARGS]...

OPTIONS:
    -o, --output <FILE>     Write the program's stdout to FILE (exec only, mode 0644)
    -s, --shell <PATH>      Shell used for `shell` [default: /bin/sh]
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    SYSEXEC_SHELL           Shell path (overrides config)
    SYSEXEC_LOG_LEVEL       Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXIT STATUS:
    0 on success, 1 if the command failed, 2 on usage errors

EXAMPLES:
    # Pipes and globs go through the shell
    sysexec shell 'ls *.txt | wc -l'

    # No PATH lookup: give the program path
    sysexec exec /bin/echo hello

    # Capture stdout into a file
    sysexec -o /tmp/out.txt exec /bin/echo hello
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("sysexec {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Error, Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),
    /// Invalid argument value.
    #[error("invalid value for {0}: '{1}'")]
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
    /// Required positional argument missing.
    #[error("missing argument: <{0}>")]
    MissingArgument(&'static str),
    /// Mode word other than `shell` or `exec`.
    #[error("unknown mode: '{0}' (expected 'shell' or 'exec')")]
    UnknownMode(String),
    /// `--output` combined with `shell`.
    #[error("--output is only supported with exec")]
    OutputWithShell,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("sysexec")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.invocation.is_none());
        assert!(result.output.is_none());
        assert!(!result.help);
    }

    #[test]
    fn test_shell_mode() {
        let result = parse_args_from(args(&["shell", "echo hi | wc -c"])).unwrap();
        assert_eq!(
            result.invocation,
            Some(Invocation::Shell("echo hi | wc -c".to_string()))
        );
    }

    #[test]
    fn test_shell_missing_command() {
        let result = parse_args_from(args(&["shell"]));
        assert!(matches!(result, Err(ArgsError::MissingArgument("COMMAND"))));
    }

    #[test]
    fn test_shell_extra_argument() {
        let result = parse_args_from(args(&["shell", "true", "extra"]));
        assert!(matches!(result, Err(ArgsError::UnexpectedArgument(_))));
    }

    #[test]
    fn test_exec_mode_passes_dashes() {
        let result = parse_args_from(args(&["exec", "/bin/echo", "-n", "--help"])).unwrap();
        assert_eq!(
            result.invocation,
            Some(Invocation::Exec {
                program: PathBuf::from("/bin/echo"),
                args: vec![OsString::from("-n"), OsString::from("--help")],
            })
        );
        assert!(!result.help);
    }

    #[test]
    fn test_exec_missing_program() {
        let result = parse_args_from(args(&["exec"]));
        assert!(matches!(result, Err(ArgsError::MissingArgument("PROGRAM"))));
    }

    #[test]
    fn test_unknown_mode() {
        let result = parse_args_from(args(&["spawn", "/bin/true"]));
        assert!(matches!(result, Err(ArgsError::UnknownMode(_))));
    }

    #[test]
    fn test_options() {
        let result = parse_args_from(args(&[
            "-o",
            "/tmp/out.txt",
            "-s",
            "/bin/bash",
            "-l",
            "debug",
            "-c",
            "/etc/sysexec.json",
            "exec",
            "/bin/true",
        ]))
        .unwrap();

        assert_eq!(result.output, Some(PathBuf::from("/tmp/out.txt")));
        assert_eq!(result.shell, Some(PathBuf::from("/bin/bash")));
        assert_eq!(result.log_level, Some("debug".to_string()));
        assert_eq!(result.config, Some(PathBuf::from("/etc/sysexec.json")));
    }

    #[test]
    fn test_help_and_version_flags() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args_from(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_command_direct() {
        let parsed = parse_args_from(args(&["exec", "/bin/echo", "hello"])).unwrap();
        let command = parsed.command().unwrap();
        let expected = ArgVector::new("/bin/echo").arg("hello");
        assert_eq!(command, Command::direct(expected));
    }

    #[test]
    fn test_command_redirect() {
        let parsed = parse_args_from(args(&["-o", "out.txt", "exec", "/bin/echo"])).unwrap();
        let command = parsed.command().unwrap();
        assert_eq!(
            command,
            Command::redirect("out.txt", ArgVector::new("/bin/echo"))
        );
    }

    #[test]
    fn test_command_output_with_shell() {
        let parsed = parse_args_from(args(&["-o", "out.txt", "shell", "true"])).unwrap();
        assert!(matches!(parsed.command(), Err(ArgsError::OutputWithShell)));
    }

    #[test]
    fn test_command_empty_program() {
        let parsed = parse_args_from(args(&["exec", ""])).unwrap();
        assert!(matches!(
            parsed.command(),
            Err(ArgsError::InvalidValue("PROGRAM", _))
        ));
    }

    #[test]
    fn test_command_missing_mode() {
        let parsed = parse_args_from(args(&[])).unwrap();
        assert!(matches!(
            parsed.command(),
            Err(ArgsError::MissingArgument("MODE"))
        ));
    }
}
