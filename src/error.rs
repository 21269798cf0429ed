//! Global error handling for scopy
//!
//! Every fatal condition of a run surfaces as a [`ScopyError`]. The
//! library never retries and never prints; the binary decides how to
//! report the error and which exit status to use.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for scopy operations
#[derive(Error, Debug)]
pub enum ScopyError {
    /// Invalid or inconsistent configuration, detected before traversal
    #[error("Configuration error: {0}")]
    Config(String),

    /// The ignore file at the traversal root exists but could not be read
    #[error("error loading {}: {source}", path.display())]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed
    #[error("Traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    /// An admitted file could not be opened or read
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the output sink failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Summary serialisation failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScopyError {
    /// Whether the underlying cause is a path that no longer exists
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Traversal(err) => err
                .io_error()
                .is_some_and(|e| e.kind() == io::ErrorKind::NotFound),
            Self::Read { source, .. } | Self::IgnoreFile { source, .. } | Self::Io(source) => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Specialized Result type for scopy operations
pub type Result<T> = std::result::Result<T, ScopyError>;

/// Creates a ScopyError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ScopyError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
