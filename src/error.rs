//! Error types for sysexec.

use std::path::PathBuf;

use thiserror::Error;

/// Reason a command run did not succeed.
///
/// The public boolean API collapses every variant to `false`; the kinds are
/// kept apart for logging and tests.
#[derive(Error, Debug)]
pub enum ExecError {
    /// Blank command line, empty program or missing output file.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The child process could not be created.
    #[error("failed to spawn {program}: {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed to wait for pid {pid}: {source}")]
    WaitFailure {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    /// The child was terminated by a signal instead of exiting.
    #[error("{program} terminated abnormally")]
    AbnormalTermination { program: String },

    /// The child exited normally with a non-zero code.
    #[error("{program} exited with code {code}")]
    NonZeroExit { program: String, code: i32 },

    /// Opening the output file or loading the executable image failed.
    #[error("child setup failed for {}: {source}", .target.display())]
    ChildSetupFailure {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Short, stable name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::SpawnFailure { .. } => "spawn_failure",
            Self::WaitFailure { .. } => "wait_failure",
            Self::AbnormalTermination { .. } => "abnormal_termination",
            Self::NonZeroExit { .. } => "non_zero_exit",
            Self::ChildSetupFailure { .. } => "child_setup_failure",
        }
    }
}

/// Convenience Result type for sysexec operations.
pub type Result<T> = std::result::Result<T, ExecError>;
