//! # sysexec
//!
//! Minimal process execution with a boolean outcome.
//!
//! A command runs either through the shell, or directly from an explicit
//! argument vector with its stdout optionally written to a file. Every call
//! blocks until the child has exited, and only a clean exit with code 0
//! counts as success.
//!
//! ## Features
//!
//! - **Shell execution**: pipes, globs and other shell syntax pass through
//! - **Direct execution**: no shell parsing, no `PATH` lookup
//! - **Redirect**: stdout to a file created with mode 0644 (minus umask)
//! - **Typed failures**: [`ExecError`] tells spawn, wait, signal, exit code
//!   and setup failures apart for callers that want more than a boolean
//!
//! ## Quick Start
//!
//! ```no_run
//! use sysexec::{direct_execute, shell_execute, ArgVector, Command, CommandExecutor};
//!
//! fn main() -> sysexec::Result<()> {
//!     sysexec::logging::try_init().ok();
//!
//!     assert!(shell_execute(Some("test -d /tmp")));
//!     assert!(direct_execute("/bin/echo", ["echo", "hello"]));
//!
//!     let executor = CommandExecutor::default();
//!     let result = executor.run(&Command::direct(ArgVector::new("/bin/true")))?;
//!     println!("pid {} finished in {:?}", result.pid, result.duration);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod writer;

// Re-export commonly used types
pub use error::{ExecError, Result};
pub use execution::{
    direct_execute, direct_execute_redirect, shell_execute, ArgVector, Command, CommandExecutor,
    ExecutionResult, ExecutorConfig, ExitOutcome,
};
