use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fs_extra::file::{copy as fs_extra_copy, CopyOptions};

/// Ensure parent directory exists for a path.
pub fn ensure_parent_exists(p: &Path) -> io::Result<()> {
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// Unique-enough suffix for temp files living next to their target.
pub(crate) fn temp_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    static NEXT_ID: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{:x}{:x}{:x}", std::process::id(), nanos & 0xffff_ffff, seq)
}

/// Absolute, symlink-free form of a path that may not exist yet.
///
/// The path is made absolute against the current directory, `.` and `..`
/// are folded lexically, and the longest existing prefix is canonicalized.
pub(crate) fn resolve(p: &Path) -> PathBuf {
    let abs = std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf());
    let mut lexical = PathBuf::new();
    for comp in abs.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut missing = Vec::new();
    let mut existing = lexical.as_path();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            return missing.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return lexical,
        }
    }
}

/// Whether `a` and `b` name the same existing file or directory.
pub(crate) fn same_target(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write `data` to `target` atomically by writing to a temporary file in the
/// same directory and then renaming into place.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => return fs::write(target, data),
    };
    fs::create_dir_all(dir)?;
    let tmp = dir.join(format!(".tmp_atomic_write.{}", temp_suffix()));
    if let Err(e) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, target).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

/// Copy the bytes of a single file, overwriting `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut options = CopyOptions::new();
    options.overwrite = true;
    // 64 KiB buffer balances throughput and memory.
    options.buffer_size = 64 * 1024;
    fs_extra_copy(src, dst, &options).map_err(io::Error::other)
}

/// Rename a single file, falling back to copy+remove when `rename` fails
/// (for example across filesystems).
pub fn rename_or_copy(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if src.is_file() => {
            tracing::warn!(
                "rename {} -> {} failed ({}), falling back to copy",
                src.display(),
                dst.display(),
                e
            );
            copy_file(src, dst)?;
            fs::remove_file(src)
        }
        Err(e) => Err(e),
    }
}
