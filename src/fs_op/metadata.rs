//! Permission changes and descriptive metadata for a path.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::fs_op::create::set_mode;
use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::path::{validate_path, PathDescriptor};
use crate::fs_op::stat::{exists_as, tree_size};
use crate::fs_op::units::{format_size, SizeUnit};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Apply the permission bits in `mode` (e.g. `0o755`) to an existing path.
///
/// On non-Unix platforms only the write bits are honoured, through the
/// read-only flag.
pub fn change_permissions<P: AsRef<Path>>(path: P, mode: u32, force: bool) -> FsResult<()> {
    let desc = validate_path(path, force)?;
    if !exists_as(&desc) {
        return Err(FsOpError::NotFound(desc.path));
    }
    set_mode(&desc.path, mode)?;
    tracing::debug!("set mode {:o} on {}", mode, desc.path.display());
    Ok(())
}

/// Descriptive information about an existing file or directory.
#[derive(Debug, Clone, Serialize)]
pub struct PathInfo {
    #[serde(flatten)]
    pub descriptor: PathDescriptor,
    pub size_raw: u64,
    pub size_unit: SizeUnit,
    pub size_formatted: String,
    pub created_at: Option<String>,
    pub modified_at: String,
}

/// Gather [`PathInfo`] for `path`.
///
/// Directory sizes are the recursive sum of their files. `created_at` is
/// `None` where the platform does not record a creation time.
pub fn path_info<P: AsRef<Path>>(path: P, force: bool) -> FsResult<PathInfo> {
    let desc = validate_path(path, force)?;
    if !exists_as(&desc) {
        return Err(FsOpError::NotFound(desc.path));
    }
    let meta = fs::metadata(&desc.path).map_err(io_err("read metadata of", &desc.path))?;

    let size_raw = if desc.is_directory() {
        tree_size(&desc.path)
    } else {
        meta.len()
    };
    let size_formatted = format_size(size_raw, SizeUnit::B, false);
    let size_unit = size_formatted
        .rsplit(' ')
        .next()
        .and_then(|u| u.parse().ok())
        .unwrap_or_default();

    let modified = meta.modified().map_err(io_err("read modification time of", &desc.path))?;

    Ok(PathInfo {
        descriptor: desc,
        size_raw,
        size_unit,
        size_formatted,
        created_at: meta.created().ok().map(format_time),
        modified_at: format_time(modified),
    })
}

fn format_time(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format(TIMESTAMP_FORMAT).to_string()
}
