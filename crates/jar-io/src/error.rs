use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure classes surfaced to the host of a pass.
///
/// Every kind aborts the pass; nothing in this crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The engine addressed an archive it never opened or already closed.
    ProtocolViolation,
    /// A bytecode entry or expected artifact does not exist.
    NotFound,
    /// Read or write failure against the filesystem or an archive stream.
    IoFailure,
    /// A directory or archive file could not be created.
    CreateFailure,
    /// A destination would land outside the output root.
    PathEscape,
    /// The engine itself reported a failure.
    Engine,
    /// The memory ceiling check refused to start the pass.
    Preflight,
}

#[derive(Error, Debug)]
pub enum JarIoError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("entry `{entry}` not found in {}", archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },

    #[error("not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("zip error in {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot create {}: {reason}", path.display())]
    Create { path: PathBuf, reason: String },

    #[error("path escapes output root: {0}")]
    PathEscape(String),

    #[error("engine failure: {0}")]
    Engine(String),

    #[error("memory ceiling not met: {available} bytes available, {required} required")]
    Preflight { available: u64, required: u64 },
}

impl JarIoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JarIoError::ProtocolViolation(_) => ErrorKind::ProtocolViolation,
            JarIoError::EntryNotFound { .. } | JarIoError::MissingFile(_) => ErrorKind::NotFound,
            JarIoError::Io { .. } | JarIoError::Zip { .. } => ErrorKind::IoFailure,
            JarIoError::Create { .. } => ErrorKind::CreateFailure,
            JarIoError::PathEscape(_) => ErrorKind::PathEscape,
            JarIoError::Engine(_) => ErrorKind::Engine,
            JarIoError::Preflight { .. } => ErrorKind::Preflight,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        JarIoError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        match source {
            zip::result::ZipError::Io(e) => JarIoError::Io {
                path: path.into(),
                source: e,
            },
            other => JarIoError::Zip {
                path: path.into(),
                source: other,
            },
        }
    }

    pub(crate) fn create(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        JarIoError::Create {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for host-side operations
pub type Result<T> = std::result::Result<T, JarIoError>;
