use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::path::validate_path;
use crate::fs_op::stat::exists_as;

/// Delete a file or directory at `path`.
///
/// Directory-classified paths are removed recursively, children before
/// their parent; file-classified paths are unlinked. Unlike a plain
/// `rm -f`, deleting something that does not exist is a `NotFound` error.
/// The first failure stops the walk and is returned as is.
///
/// # Examples
///
/// ```no_run
/// use ezfs::fs_op::remove::delete_path;
/// delete_path("/tmp/some_file.txt", false).expect("delete failed");
/// ```
pub fn delete_path<P: AsRef<Path>>(path: P, force: bool) -> FsResult<()> {
    let desc = validate_path(path, force)?;
    if !exists_as(&desc) {
        return Err(FsOpError::NotFound(desc.path));
    }

    if desc.is_directory() {
        delete_tree(&desc.path)?;
    } else {
        fs::remove_file(&desc.path).map_err(io_err("delete the file", &desc.path))?;
    }
    tracing::debug!("deleted {}", desc.path.display());
    Ok(())
}

pub(crate) fn delete_tree(root: &Path) -> FsResult<()> {
    for entry in WalkDir::new(root).contents_first(true).follow_links(false) {
        let entry = entry.map_err(|e| FsOpError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            action: "walk",
            source: e.into(),
        })?;
        let p = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir(p).map_err(io_err("delete the directory", p))?;
        } else {
            fs::remove_file(p).map_err(io_err("delete the file", p))?;
        }
    }
    Ok(())
}
