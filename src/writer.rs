//! File writer utility.
//!
//! Backs the `writer <file> <string>` binary: create or truncate the file and
//! write the string verbatim, with no trailing newline. Every outcome is
//! logged under the `writer` target.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

/// Writer failures.
#[derive(Error, Debug)]
pub enum WriterError {
    /// Wrong number of arguments.
    #[error("invalid arguments. Usage: {program} <file> <string>")]
    Usage { program: String },

    /// The file could not be opened.
    #[error("failed to open file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the content failed.
    #[error("failed to write to file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Create or truncate `path` and write the bytes of `text` to it unchanged.
pub fn write_file(path: &Path, text: &OsStr) -> Result<(), WriterError> {
    let mut file = File::create(path).map_err(|source| WriterError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(text_bytes(text))
        .and_then(|()| file.flush())
        .map_err(|source| WriterError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        target: "writer",
        "writing {} to {}",
        text.to_string_lossy(),
        path.display()
    );
    Ok(())
}

#[cfg(unix)]
fn text_bytes(text: &OsStr) -> &[u8] {
    use std::os::unix::ffi::OsStrExt;
    text.as_bytes()
}

#[cfg(not(unix))]
fn text_bytes(text: &OsStr) -> &[u8] {
    text.as_encoded_bytes()
}

/// Run the utility with a full argument list (program name first).
///
/// Returns the process exit code: 0 on success, 1 on any failure.
pub fn run<I>(args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let result = match args.as_slice() {
        [_, path, text] => write_file(Path::new(path), text),
        _ => Err(WriterError::Usage {
            program: args
                .first()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| "writer".to_string()),
        }),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!(target: "writer", "{}", err);
            1
        }
    }
}
