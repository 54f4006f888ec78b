use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::helpers::{atomic_write, ensure_parent_exists};
use crate::fs_op::path::validate_path;

/// Read a whole text file.
pub fn read_file<P: AsRef<Path>>(path: P, force: bool) -> FsResult<String> {
    let desc = validate_path(path, force)?;
    if desc.is_directory() {
        return Err(FsOpError::not_file(desc.path));
    }
    if !desc.path.is_file() {
        return Err(FsOpError::NotFound(desc.path));
    }
    fs::read_to_string(&desc.path).map_err(io_err("read", &desc.path))
}

/// Write `content` to a file, creating its parent directory.
///
/// With `replace` the file is swapped in atomically. Otherwise `content` is
/// appended, on a new line if the file already has data.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    content: impl AsRef<[u8]>,
    replace: bool,
    force: bool,
) -> FsResult<()> {
    let desc = validate_path(path, force)?;
    if desc.is_directory() {
        return Err(FsOpError::not_file(desc.path));
    }
    let target = desc.path.as_path();
    ensure_parent_exists(target).map_err(io_err("create the parent of", target))?;

    if replace {
        atomic_write(target, content.as_ref()).map_err(io_err("write", target))?;
    } else {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(target)
            .map_err(io_err("open", target))?;
        let len = file.metadata().map_err(io_err("read metadata of", target))?.len();
        if len > 0 {
            file.write_all(b"\n").map_err(io_err("write", target))?;
        }
        file.write_all(content.as_ref()).map_err(io_err("write", target))?;
    }
    tracing::debug!("wrote {}", target.display());
    Ok(())
}
