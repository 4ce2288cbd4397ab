//! Command execution engine.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command as Process, Stdio};
use std::time::Instant;

use tracing::{debug, warn};

use super::command::{ArgVector, Command};
use super::result::{ExecutionResult, ExitOutcome};
use crate::error::ExecError;
use crate::Result;

/// Default permission bits for redirect output files (before umask).
pub const DEFAULT_OUTPUT_MODE: u32 = 0o644;

/// Default shell interpreter.
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";

/// Flag that makes the shell run its next argument as a command line.
#[cfg(not(windows))]
pub const DEFAULT_SHELL_FLAG: &str = "-c";
#[cfg(windows)]
pub const DEFAULT_SHELL_FLAG: &str = "/C";

/// Executor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Shell used for command lines.
    pub shell: PathBuf,
    /// Argument placed before the command line.
    pub shell_flag: String,
    /// Permission bits for newly created output files.
    pub output_mode: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            shell_flag: DEFAULT_SHELL_FLAG.to_string(),
            output_mode: DEFAULT_OUTPUT_MODE,
        }
    }
}

/// Runs commands to completion, one child at a time.
///
/// Every call blocks until the child it spawned has been reaped. Nothing is
/// carried between calls.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    config: ExecutorConfig,
}

impl CommandExecutor {
    /// Create a new command executor.
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Executor settings.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run a command and wait for it.
    ///
    /// Returns the result only when the child exited normally with code 0;
    /// every other outcome is an [`ExecError`] naming the reason.
    pub fn run(&self, command: &Command) -> Result<ExecutionResult> {
        command.validate()?;
        let label = command.label();

        let (process, target) = match command {
            Command::Shell(line) => (self.shell_process(line), self.config.shell.clone()),
            Command::Direct(argv) => {
                let program = exec_path(argv.program());
                (direct_process(&program, argv), program)
            }
            Command::DirectRedirect { output, argv } => {
                // Created or truncated before the program is launched, even
                // if the launch then fails.
                let file = self.open_output(output)?;
                let program = exec_path(argv.program());
                let mut process = direct_process(&program, argv);
                process.stdout(Stdio::from(file));
                (process, program)
            }
        };

        flush_stdout();
        spawn_and_wait(process, &target, &label)?.into_result(&label)
    }

    /// Run a command and collapse the outcome to success or failure.
    pub fn execute(&self, command: &Command) -> bool {
        match self.run(command) {
            Ok(result) => {
                debug!(
                    command = %command.label(),
                    pid = result.pid,
                    elapsed_ms = result.duration.as_millis() as u64,
                    "command succeeded"
                );
                true
            }
            Err(err) => {
                log_failure(&command.label(), &err);
                false
            }
        }
    }

    fn shell_process(&self, line: &str) -> Process {
        let mut process = Process::new(&self.config.shell);
        process.arg(&self.config.shell_flag).arg(line);
        process
    }

    fn open_output(&self, path: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.config.output_mode);
        }

        options
            .open(path)
            .map_err(|source| ExecError::ChildSetupFailure {
                target: path.to_path_buf(),
                source,
            })
    }
}

/// Path handed to the spawn primitive.
///
/// Bare names are taken relative to the working directory, never looked up
/// in `PATH`.
fn exec_path(program: &Path) -> PathBuf {
    if program.parent() == Some(Path::new("")) {
        Path::new(".").join(program)
    } else {
        program.to_path_buf()
    }
}

fn direct_process(program: &Path, argv: &ArgVector) -> Process {
    let mut process = Process::new(program);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        process.arg0(argv.arg0());
    }

    process.args(argv.rest());
    process
}

fn flush_stdout() {
    if let Err(err) = std::io::stdout().flush() {
        warn!(error = %err, "failed to flush stdout before spawn");
    }
}

/// Spawn, release the parent's copies of redirected handles, then wait on
/// exactly this child.
fn spawn_and_wait(mut process: Process, target: &Path, label: &str) -> Result<ExecutionResult> {
    let start = Instant::now();
    let spawned = process.spawn();
    drop(process);

    let mut child = spawned.map_err(|source| spawn_error(target, label, source))?;
    let pid = child.id();
    debug!(pid, command = %label, "child spawned");

    let status = child
        .wait()
        .map_err(|source| ExecError::WaitFailure { pid, source })?;
    let outcome = ExitOutcome::from_status(status);
    debug!(pid, command = %label, %status, "child exited");

    Ok(ExecutionResult::new(pid, outcome, start.elapsed()))
}

/// Image load failures are reported by the spawn call itself; keep them apart
/// from a failure to create the process at all.
fn spawn_error(target: &Path, label: &str, source: std::io::Error) -> ExecError {
    match source.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            ExecError::ChildSetupFailure {
                target: target.to_path_buf(),
                source,
            }
        }
        _ => ExecError::SpawnFailure {
            program: label.to_string(),
            source,
        },
    }
}

fn log_failure(label: &str, err: &ExecError) {
    warn!(command = %label, kind = err.kind(), error = %err, "command failed");
}

/// Run a command line through the default shell.
///
/// `None` or a blank command line fails without spawning anything.
pub fn shell_execute(command: Option<&str>) -> bool {
    let Some(command) = command else {
        log_failure(
            "<none>",
            &ExecError::InvalidArgument("no command line given".into()),
        );
        return false;
    };
    CommandExecutor::default().execute(&Command::shell(command))
}

/// Launch `program` directly with `argv` (`argv[0]` first).
///
/// An empty `argv` uses the program path as `argv[0]`.
pub fn direct_execute<I, S>(program: impl Into<PathBuf>, argv: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    match ArgVector::with_argv(program, argv) {
        Ok(argv) => CommandExecutor::default().execute(&Command::direct(argv)),
        Err(err) => {
            log_failure("<direct>", &err);
            false
        }
    }
}

/// Launch `program` directly with its stdout written to `output`.
///
/// `None` for `output` fails without spawning anything or touching a file.
pub fn direct_execute_redirect<I, S>(
    output: Option<&Path>,
    program: impl Into<PathBuf>,
    argv: I,
) -> bool
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let Some(output) = output else {
        log_failure(
            "<redirect>",
            &ExecError::InvalidArgument("no output file given".into()),
        );
        return false;
    };

    match ArgVector::with_argv(program, argv) {
        Ok(argv) => CommandExecutor::default().execute(&Command::redirect(output, argv)),
        Err(err) => {
            log_failure("<redirect>", &err);
            false
        }
    }
}
