use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::path::{validate_path, PathDescriptor, PathKind};

/// Check existence according to the lexical classification: a
/// directory-classified path must be an existing directory, a
/// file-classified path an existing regular file.
pub fn exists<P: AsRef<Path>>(path: P, force: bool) -> FsResult<bool> {
    let desc = validate_path(path, force)?;
    Ok(exists_as(&desc))
}

pub(crate) fn exists_as(desc: &PathDescriptor) -> bool {
    match desc.kind() {
        PathKind::Directory => desc.path.is_dir(),
        PathKind::File => desc.path.is_file(),
    }
}

/// List the immediate children of a directory.
///
/// Only children that pass [`exists`] under their own classification are
/// returned; a missing directory lists as empty. Order follows the
/// filesystem's enumeration order.
pub fn list<P: AsRef<Path>>(path: P, force: bool) -> FsResult<Vec<PathBuf>> {
    let desc = validate_path(path, force)?;
    if desc.is_file() {
        return Err(FsOpError::not_dir(&desc.path));
    }
    if !exists_as(&desc) {
        return Ok(Vec::new());
    }

    let mut children = Vec::new();
    for entry in fs::read_dir(&desc.path).map_err(io_err("open directory", &desc.path))? {
        let entry = entry.map_err(io_err("read directory", &desc.path))?;
        let child = desc.path.join(entry.file_name());
        if matches!(exists(&child, force), Ok(true)) {
            children.push(child);
        }
    }
    Ok(children)
}

/// Total size in bytes of `path`.
///
/// A file reports its own length. A directory reports the sum of every file
/// beneath it, counting linked files at their target's size; entries that
/// vanish or cannot be read during the walk are skipped.
pub fn path_size<P: AsRef<Path>>(path: P, force: bool) -> FsResult<u64> {
    let desc = validate_path(path, force)?;
    if !desc.path.exists() {
        return Err(FsOpError::NotFound(desc.path));
    }
    Ok(tree_size(&desc.path))
}

pub(crate) fn tree_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
