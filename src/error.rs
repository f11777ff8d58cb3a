use std::path::{Path, PathBuf};

use thiserror::Error;

/// Recoverable failures. Contract violations by the caller (stepping out of
/// sequence, mismatched sensation lengths) panic instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to {operation} '{}': {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed policy file '{}' at line {line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("policy file has {found} actions per state, agent has {expected}")]
    ActionCountMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// `map_err` adapter that labels an I/O failure with what was being done and
/// to which file.
pub(crate) fn io_error<'a>(
    operation: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> Error + 'a {
    move |source| Error::Io {
        operation,
        path: path.to_path_buf(),
        source,
    }
}
