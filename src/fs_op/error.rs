use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of an [`FsOpError`], for callers that branch on the kind
/// of failure rather than on its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPath,
    AccessDenied,
    NotFound,
    TypeMismatch,
    IoFailure,
    ArchiveFailure,
}

/// Errors produced by every filesystem operation in `fs_op`.
///
/// The `Display` output is the human-readable message meant for end users.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// The path string could not be parsed, or the request makes no sense
    /// for it (for example moving a directory into itself).
    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The path contains a `..` segment and `force` was not set.
    #[error("Access denied to manipulate directory levels in `{0}` without force")]
    AccessDenied(String),

    /// The operation target does not exist.
    #[error("`{}` does not exist", .0.display())]
    NotFound(PathBuf),

    /// The operation needs a file but got a directory-classified path, or
    /// the other way round.
    #[error("`{}` is not a {expected}", path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: &'static str,
    },

    /// Wrapper for underlying IO errors on a single path.
    #[error("Could not {action} `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: io::Error,
    },

    /// Contextual IO error that includes source and destination paths.
    #[error("Operation failed from `{}` to `{}`: {source}", src.display(), dst.display())]
    PathContext {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be opened, created or extracted.
    #[error("Archive error for `{}`: {msg}", path.display())]
    Archive { path: PathBuf, msg: String },
}

pub type FsResult<T> = Result<T, FsOpError>;

impl FsOpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsOpError::InvalidPath { .. } => ErrorKind::InvalidPath,
            FsOpError::AccessDenied(_) => ErrorKind::AccessDenied,
            FsOpError::NotFound(_) => ErrorKind::NotFound,
            FsOpError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            FsOpError::Io { .. } | FsOpError::PathContext { .. } => ErrorKind::IoFailure,
            FsOpError::Archive { .. } => ErrorKind::ArchiveFailure,
        }
    }

    pub(crate) fn not_file(path: impl Into<PathBuf>) -> Self {
        FsOpError::TypeMismatch {
            path: path.into(),
            expected: "file",
        }
    }

    pub(crate) fn not_dir(path: impl Into<PathBuf>) -> Self {
        FsOpError::TypeMismatch {
            path: path.into(),
            expected: "directory",
        }
    }
}

/// Build a `map_err` adapter that attaches `path` and a verb to an IO error.
pub(crate) fn io_err<'a>(
    action: &'static str,
    path: &'a std::path::Path,
) -> impl FnOnce(io::Error) -> FsOpError + 'a {
    move |source| FsOpError::Io {
        path: path.to_path_buf(),
        action,
        source,
    }
}
