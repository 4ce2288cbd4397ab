//! Command building and representation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ExecError;
use crate::Result;

/// Program path plus the argument vector it receives.
///
/// `argv[0]` is what the program sees as its own name; the remaining
/// elements are its arguments. The vector is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector {
    program: PathBuf,
    argv: Vec<OsString>,
}

impl ArgVector {
    /// Vector for `program` with `argv[0]` set to the program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let argv = vec![program.clone().into_os_string()];
        Self { program, argv }
    }

    /// Vector where element 0 is both the program path and `argv[0]`.
    ///
    /// Fails when the sequence is empty or element 0 is empty.
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let first = argv
            .first()
            .ok_or_else(|| ExecError::InvalidArgument("empty argument vector".into()))?;
        let program = PathBuf::from(first);
        Self::with_argv(program, argv)
    }

    /// Vector for `program` with an explicit argv.
    ///
    /// An empty `argv` falls back to the program path as `argv[0]`.
    pub fn with_argv<I, S>(program: impl Into<PathBuf>, argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let program = program.into();
        if program.as_os_str().is_empty() {
            return Err(ExecError::InvalidArgument("empty program path".into()));
        }

        let mut argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            argv.push(program.clone().into_os_string());
        }

        Ok(Self { program, argv })
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// Path of the executable to launch.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The name passed as `argv[0]`.
    pub fn arg0(&self) -> &OsString {
        &self.argv[0]
    }

    /// Arguments after `argv[0]`.
    pub fn rest(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// The full vector, `argv[0]` included.
    pub fn as_slice(&self) -> &[OsString] {
        &self.argv
    }

    /// Number of elements, `argv[0]` included. Always at least 1.
    pub fn len(&self) -> usize {
        self.argv.len()
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// A process launch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hand a command line to the configured shell.
    Shell(String),
    /// Launch a program directly, stdout inherited.
    Direct(ArgVector),
    /// Launch a program directly with stdout written to `output`.
    DirectRedirect { output: PathBuf, argv: ArgVector },
}

impl Command {
    /// Shell command line.
    pub fn shell(command_line: impl Into<String>) -> Self {
        Self::Shell(command_line.into())
    }

    /// Direct launch.
    pub fn direct(argv: ArgVector) -> Self {
        Self::Direct(argv)
    }

    /// Direct launch with stdout redirected to `output`.
    pub fn redirect(output: impl Into<PathBuf>, argv: ArgVector) -> Self {
        Self::DirectRedirect {
            output: output.into(),
            argv,
        }
    }

    /// Human-readable label for logs and errors.
    pub fn label(&self) -> String {
        match self {
            Self::Shell(line) => line.clone(),
            Self::Direct(argv) | Self::DirectRedirect { argv, .. } => {
                argv.program().display().to_string()
            }
        }
    }

    /// Check argument constraints that must hold before anything is spawned.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Shell(line) => {
                if line.trim().is_empty() {
                    return Err(ExecError::InvalidArgument("empty command line".into()));
                }
                if line.contains('\0') {
                    return Err(ExecError::InvalidArgument(
                        "command line contains a NUL byte".into(),
                    ));
                }
            }
            Self::Direct(argv) => validate_program(argv)?,
            Self::DirectRedirect { output, argv } => {
                if output.as_os_str().is_empty() {
                    return Err(ExecError::InvalidArgument("empty output file path".into()));
                }
                validate_program(argv)?;
            }
        }
        Ok(())
    }
}

fn validate_program(argv: &ArgVector) -> Result<()> {
    if argv.program().as_os_str().is_empty() {
        return Err(ExecError::InvalidArgument("empty program path".into()));
    }
    Ok(())
}
