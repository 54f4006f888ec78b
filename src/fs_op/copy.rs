use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::fs_op::create::create_dir_all;
use crate::fs_op::error::{FsOpError, FsResult};
use crate::fs_op::helpers::{copy_file, ensure_parent_exists, same_target};
use crate::fs_op::path::validate_path;

/// Copy a file or directory from `from` to `to`.
///
/// A directory-classified source is copied recursively: `to` is created
/// first, then the tree is walked depth-first, creating each sub-directory
/// before copying the files inside it. The first failure stops the copy and
/// is returned; whatever was copied up to that point stays in place.
///
/// A file-classified source has its bytes copied to `to` (overwriting it),
/// creating `to`'s parent directory when needed.
///
/// Symbolic links inside a tree are followed: the copy receives the bytes
/// of the linked file. Copying a path onto itself is a no-op.
pub fn copy_path<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q, force: bool) -> FsResult<()> {
    let src = validate_path(from, force)?;
    let dst = validate_path(to, force)?;

    if same_target(&src.path, &dst.path) {
        tracing::debug!("copy of {} onto itself skipped", src.path.display());
        return Ok(());
    }

    if src.is_directory() {
        if !src.path.is_dir() {
            return Err(FsOpError::NotFound(src.path));
        }
        copy_tree(&src.path, &dst.path)?;
    } else {
        if !src.path.is_file() {
            return Err(FsOpError::NotFound(src.path));
        }
        copy_one(&src.path, &dst.path)?;
    }
    tracing::debug!("copied {} -> {}", src.path.display(), dst.path.display());
    Ok(())
}

pub(crate) fn copy_tree(src: &Path, dst: &Path) -> FsResult<()> {
    create_dir_all(dst)?;

    // Copying into our own subtree would keep discovering the copies.
    let skip = fs::canonicalize(dst).ok();

    let mut walker = WalkDir::new(src).min_depth(1).follow_links(true).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| FsOpError::PathContext {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source: e.into(),
        })?;
        let from = entry.path();
        let rel = match from.strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dst.join(rel);
        // With links followed this is the type of the link target.
        let ft = entry.file_type();

        if ft.is_dir() {
            if skip.is_some() && fs::canonicalize(from).ok() == skip {
                walker.skip_current_dir();
                continue;
            }
            create_dir_all(&target)?;
        } else if ft.is_file() {
            copy_one(from, &target)?;
        } else {
            tracing::debug!("skipping special file {}", from.display());
        }
    }
    Ok(())
}

fn copy_one(src: &Path, dst: &Path) -> FsResult<()> {
    let ctx = |source| FsOpError::PathContext {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };
    // Truncating `dst` first would wipe `src` when both are one file.
    if same_target(src, dst) {
        return Ok(());
    }
    ensure_parent_exists(dst).map_err(ctx)?;
    copy_file(src, dst).map_err(ctx)?;
    Ok(())
}
