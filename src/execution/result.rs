//! Execution result types.

use std::process::ExitStatus;
use std::time::Duration;

use crate::error::ExecError;
use crate::Result;

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with code 0.
    Success,
    /// Normal exit with a non-zero code.
    NonZero(i32),
    /// Killed by a signal or otherwise did not exit normally.
    Abnormal,
}

impl ExitOutcome {
    /// Decode a platform exit status.
    ///
    /// Only the normal/abnormal split and the exit code are used; signal
    /// numbers are not interpreted.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Self::Success,
            Some(code) => Self::NonZero(code),
            None => Self::Abnormal,
        }
    }

    /// Check if the child exited cleanly with code 0.
    pub fn success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Exit code, if the child exited normally.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Success => Some(0),
            Self::NonZero(code) => Some(*code),
            Self::Abnormal => None,
        }
    }
}

/// Result of a completed child process.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Process id of the child.
    pub pid: u32,
    /// How the child terminated.
    pub outcome: ExitOutcome,
    /// Time from spawn to reap.
    pub duration: Duration,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(pid: u32, outcome: ExitOutcome, duration: Duration) -> Self {
        Self {
            pid,
            outcome,
            duration,
        }
    }

    /// Check if command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    /// Turn a non-successful termination into the matching error.
    pub fn into_result(self, program: &str) -> Result<Self> {
        match self.outcome {
            ExitOutcome::Success => Ok(self),
            ExitOutcome::NonZero(code) => Err(ExecError::NonZeroExit {
                program: program.to_string(),
                code,
            }),
            ExitOutcome::Abnormal => Err(ExecError::AbnormalTermination {
                program: program.to_string(),
            }),
        }
    }
}
