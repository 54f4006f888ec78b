use std::fs;
use std::path::{Path, PathBuf};

use crate::fs_op::create::create_dir_all;
use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::helpers::{ensure_parent_exists, rename_or_copy, resolve};
use crate::fs_op::path::validate_path;
use crate::fs_op::sanitize::sanitize_name;
use crate::fs_op::stat::exists_as;

/// Move a file or directory from `from` to `to`.
///
/// Directories are moved entry by entry: `to` is created, every child is
/// moved into it (sub-directories recursively), and the emptied source is
/// removed last. Moving a directory onto itself is a no-op. A failure part
/// way through leaves both trees partially populated.
///
/// Files are renamed into place after creating `to`'s parent, falling back
/// to copy+remove when a plain rename is not possible.
pub fn move_path<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q, force: bool) -> FsResult<()> {
    let src = validate_path(from, force)?;
    let dst = validate_path(to, force)?;

    if !exists_as(&src) {
        return Err(FsOpError::NotFound(src.path));
    }

    if src.is_directory() {
        let (from, to) = (resolve(&src.path), resolve(&dst.path));
        if from == to {
            return Ok(());
        }
        if to.starts_with(&from) {
            return Err(FsOpError::InvalidPath {
                path: dst.path.display().to_string(),
                reason: format!("cannot move `{}` into itself", src.path.display()),
            });
        }
        move_tree(&src.path, &dst.path)?;
    } else {
        move_file(&src.path, &dst.path)?;
    }
    tracing::debug!("moved {} -> {}", src.path.display(), dst.path.display());
    Ok(())
}

fn move_tree(src: &Path, dst: &Path) -> FsResult<()> {
    create_dir_all(dst)?;

    // Collect first so the directory is not mutated while being read.
    let entries: Vec<_> = fs::read_dir(src)
        .map_err(io_err("open directory", src))?
        .collect::<Result<_, _>>()
        .map_err(io_err("read directory", src))?;

    for entry in entries {
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let ft = entry.file_type().map_err(io_err("inspect", &from))?;
        if ft.is_dir() {
            move_tree(&from, &to)?;
        } else {
            move_file(&from, &to)?;
        }
    }

    fs::remove_dir(src).map_err(io_err("remove the directory", src))
}

fn move_file(src: &Path, dst: &Path) -> FsResult<()> {
    let ctx = |source| FsOpError::PathContext {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };
    ensure_parent_exists(dst).map_err(ctx)?;
    rename_or_copy(src, dst).map_err(ctx)
}

/// Rename `path` within its own directory.
///
/// The new location is `dirname(path)/new_name`. With `sanitize` the new
/// name goes through [`sanitize_name`] first.
pub fn rename_path<P: AsRef<Path>>(
    path: P,
    new_name: &str,
    sanitize: bool,
    force: bool,
) -> FsResult<()> {
    let src = validate_path(path, force)?;
    // The new name is subject to the same traversal rule as the path.
    validate_path(new_name, force)?;

    if !exists_as(&src) {
        return Err(FsOpError::NotFound(src.path));
    }

    let name = if sanitize {
        sanitize_name(new_name)
    } else {
        new_name.to_string()
    };
    let dest: PathBuf = match src.path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    };

    fs::rename(&src.path, &dest).map_err(|source| FsOpError::PathContext {
        src: src.path.clone(),
        dst: dest.clone(),
        source,
    })?;
    tracing::debug!("renamed {} -> {}", src.path.display(), dest.display());
    Ok(())
}
