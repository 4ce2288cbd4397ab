//! Command execution engine.
//!
//! Three ways to run a child process to completion:
//! - through the shell (`Command::Shell`)
//! - directly with an argument vector (`Command::Direct`)
//! - directly with stdout redirected to a file (`Command::DirectRedirect`)
//!
//! # Example
//!
//! ```no_run
//! use sysexec::execution::{direct_execute_redirect, shell_execute, ArgVector, Command, CommandExecutor};
//! use std::path::Path;
//!
//! // Boolean one-shot helpers
//! assert!(shell_execute(Some("echo hello | tr a-z A-Z")));
//! assert!(direct_execute_redirect(
//!     Some(Path::new("/tmp/out.txt")),
//!     "/bin/echo",
//!     ["echo", "hello"],
//! ));
//!
//! // Distinguished errors
//! let executor = CommandExecutor::default();
//! let argv = ArgVector::new("/bin/ls").arg("-l");
//! if let Err(err) = executor.run(&Command::direct(argv)) {
//!     eprintln!("ls failed: {err}");
//! }
//! ```

mod command;
mod executor;
mod result;

pub use command::{ArgVector, Command};
pub use executor::{
    direct_execute, direct_execute_redirect, shell_execute, CommandExecutor, ExecutorConfig,
    DEFAULT_OUTPUT_MODE, DEFAULT_SHELL, DEFAULT_SHELL_FLAG,
};
pub use result::{ExecutionResult, ExitOutcome};
