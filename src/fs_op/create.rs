use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::fs_op::error::{io_err, FsResult};
use crate::fs_op::path::{validate_path, PathDescriptor};
use crate::fs_op::sanitize::sanitize_name;

/// Create a file or directory at `path`.
///
/// Directory-classified paths are created together with any missing
/// ancestors. File-classified paths get their parent directory created and
/// then an empty file with mode `0o777`. Creating something that already
/// exists succeeds without touching it.
///
/// With `sanitize` the last path component is passed through
/// [`sanitize_name`] first; the file-or-directory decision is still taken
/// from `path` as given.
pub fn create<P: AsRef<Path>>(path: P, sanitize: bool, force: bool) -> FsResult<()> {
    let desc = validate_path(path, force)?;
    let target = if sanitize {
        sanitized_target(&desc)
    } else {
        desc.path.clone()
    };

    if desc.is_directory() {
        return create_dir_all(&target);
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    if target.is_file() {
        return Ok(());
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(io_err("create the file", &target))?;
    set_mode(&target, 0o777)?;
    tracing::debug!("created file {}", target.display());
    Ok(())
}

/// Create directory and parents; an existing directory is not an error.
pub(crate) fn create_dir_all(path: &Path) -> FsResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(io_err("create the directory", path))?;
    tracing::debug!("created directory {}", path.display());
    Ok(())
}

/// `desc.path` with its final component sanitized.
pub(crate) fn sanitized_target(desc: &PathDescriptor) -> PathBuf {
    let name = sanitize_name(&desc.basename);
    match desc.path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, mode: u32) -> FsResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(io_err("change permissions of", path))
}

#[cfg(not(unix))]
pub(crate) fn set_mode(path: &Path, mode: u32) -> FsResult<()> {
    let mut perms = fs::metadata(path)
        .map_err(io_err("read metadata of", path))?
        .permissions();
    perms.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(path, perms).map_err(io_err("change permissions of", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_file_and_dir() {
        let td = tempdir().unwrap();
        let dir = td.path().join("a/b");
        let file = td.path().join("c/d/f.txt");
        create(&dir, false, false).unwrap();
        create(&file, false, false).unwrap();
        assert!(dir.is_dir());
        assert!(file.is_file());
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);
    }

    #[test]
    fn create_is_idempotent() {
        let td = tempdir().unwrap();
        let file = td.path().join("keep.txt");
        create(&file, false, false).unwrap();
        fs::write(&file, "content").unwrap();
        create(&file, false, false).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "content");

        let dir = td.path().join("twice");
        create(&dir, false, false).unwrap();
        create(&dir, false, false).unwrap();
        assert!(dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn created_files_are_world_writable() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let file = td.path().join("open.txt");
        create(&file, false, false).unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o777);
    }

    #[test]
    fn sanitize_rewrites_last_component_only() {
        let td = tempdir().unwrap();
        create(td.path().join("Minhas Fotos"), true, false).unwrap();
        assert!(td.path().join("minhas fotos").is_dir());

        create(td.path().join("Relatório.txt"), true, false).unwrap();
        assert!(td.path().join("relatorio_txt").is_file());
    }
}
