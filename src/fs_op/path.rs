use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::fs_op::error::{FsOpError, FsResult};

/// File-vs-directory classification of a path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Directory,
}

/// Structured components of a validated path.
///
/// Classification is purely lexical: a path whose basename carries an
/// extension is a file target, anything else is a directory target, whether
/// or not it exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDescriptor {
    #[serde(skip)]
    pub path: PathBuf,
    pub basename: String,
    pub dirname: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl PathDescriptor {
    pub fn kind(&self) -> PathKind {
        if self.extension.is_some() {
            PathKind::File
        } else {
            PathKind::Directory
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == PathKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind() == PathKind::File
    }

    /// The containing directory as a path.
    pub fn parent(&self) -> &Path {
        Path::new(&self.dirname)
    }
}

/// Validate `path` and split it into its components.
///
/// A `..` anywhere in the path is refused unless `force` is set. Empty paths
/// and paths containing NUL bytes are invalid.
pub fn validate_path<P: AsRef<Path>>(path: P, force: bool) -> FsResult<PathDescriptor> {
    let p = path.as_ref();
    let raw = p.to_string_lossy();

    if raw.contains("..") && !force {
        return Err(FsOpError::AccessDenied(raw.into_owned()));
    }
    if raw.is_empty() {
        return Err(FsOpError::InvalidPath {
            path: String::new(),
            reason: "empty path".into(),
        });
    }
    if raw.contains('\0') {
        return Err(FsOpError::InvalidPath {
            path: raw.replace('\0', "\\0"),
            reason: "path contains a NUL byte".into(),
        });
    }

    let (dirname, basename) = split(&raw);
    let (filename, extension) = match basename {
        "." | ".." => (basename.to_string(), None),
        _ => match basename.rfind('.') {
            Some(i) => (basename[..i].to_string(), Some(basename[i + 1..].to_string())),
            None => (basename.to_string(), None),
        },
    };

    Ok(PathDescriptor {
        path: p.to_path_buf(),
        basename: basename.to_string(),
        dirname,
        filename,
        extension,
    })
}

/// Classify `path` without touching the filesystem.
pub fn classify<P: AsRef<Path>>(path: P) -> FsResult<PathKind> {
    validate_path(path, true).map(|d| d.kind())
}

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

// Split into (dirname, basename), ignoring trailing separators.
fn split(raw: &str) -> (String, &str) {
    let trimmed = raw.trim_end_matches(is_sep);
    if trimmed.is_empty() {
        // Only separators: the root itself.
        return (raw[..1].to_string(), "");
    }
    match trimmed.rfind(is_sep) {
        Some(i) => {
            let dir = trimmed[..i].trim_end_matches(is_sep);
            let dir = if dir.is_empty() { &trimmed[..1] } else { dir };
            (dir.to_string(), &trimmed[i + 1..])
        }
        None => (".".to_string(), trimmed),
    }
}
