//! Zip archive creation and extraction.
//!
//! Archives use DEFLATE, no encryption, and `/`-joined entry names relative
//! to the zipped directory. Extraction opens the whole archive at once.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::fs_op::create::create_dir_all;
use crate::fs_op::error::{FsOpError, FsResult};
use crate::fs_op::path::validate_path;

fn archive_err(path: &Path) -> impl FnOnce(ZipError) -> FsOpError + '_ {
    move |e| FsOpError::Archive {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

fn archive_io_err(path: &Path) -> impl FnOnce(io::Error) -> FsOpError + '_ {
    move |e| FsOpError::Archive {
        path: path.to_path_buf(),
        msg: e.to_string(),
    }
}

/// Zip the directory `source_dir` into `dest_dir/<basename>.zip`.
///
/// Any existing archive of that name is overwritten. Only regular files are
/// stored, linked files with their target's bytes; empty directories do not
/// survive the round trip. Returns the
/// path of the written archive.
pub fn zip_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    dest_dir: Q,
    force: bool,
) -> FsResult<PathBuf> {
    let src = validate_path(source_dir, force)?;
    if src.is_file() {
        return Err(FsOpError::not_dir(src.path));
    }
    if !src.path.is_dir() {
        return Err(FsOpError::NotFound(src.path));
    }
    // The destination is always used as a directory, whatever its name.
    let dest = validate_path(dest_dir, force)?;
    create_dir_all(&dest.path)?;

    let archive_path = dest.path.join(format!("{}.zip", src.basename));
    let file = File::create(&archive_path).map_err(archive_io_err(&archive_path))?;
    // The archive may sit inside the tree being zipped.
    let archive_real = fs::canonicalize(&archive_path).ok();

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0usize;

    for entry in WalkDir::new(&src.path).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| FsOpError::Archive {
            path: archive_path.clone(),
            msg: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if archive_real.is_some() && fs::canonicalize(entry.path()).ok() == archive_real {
            continue;
        }
        let rel = match entry.path().strip_prefix(&src.path) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options).map_err(archive_err(&archive_path))?;
        let mut input = File::open(entry.path()).map_err(archive_io_err(entry.path()))?;
        io::copy(&mut input, &mut zip).map_err(archive_io_err(&archive_path))?;
        count += 1;
    }

    zip.finish().map_err(archive_err(&archive_path))?;
    tracing::debug!(
        "zipped {} files from {} into {}",
        count,
        src.path.display(),
        archive_path.display()
    );
    Ok(archive_path)
}

/// Extract the archive at `zip_path` into `dest_dir`.
///
/// `zip_path` must carry a `zip` extension (any case) and `dest_dir` must be
/// directory-classified. Entry names that would escape `dest_dir` are
/// refused by the archive reader.
pub fn unzip<P: AsRef<Path>, Q: AsRef<Path>>(zip_path: P, dest_dir: Q, force: bool) -> FsResult<()> {
    let archive = validate_path(zip_path, force)?;
    match archive.extension.as_deref() {
        None => return Err(FsOpError::not_file(archive.path)),
        Some(ext) if !ext.eq_ignore_ascii_case("zip") => {
            return Err(FsOpError::TypeMismatch {
                path: archive.path,
                expected: "zip archive",
            })
        }
        Some(_) => {}
    }

    let dest = validate_path(dest_dir, force)?;
    if dest.is_file() {
        return Err(FsOpError::not_dir(dest.path));
    }
    if !dest.parent().is_dir() {
        create_dir_all(dest.parent())?;
    }

    let file = File::open(&archive.path).map_err(archive_io_err(&archive.path))?;
    let mut zip = ZipArchive::new(file).map_err(archive_err(&archive.path))?;
    zip.extract(&dest.path).map_err(archive_err(&archive.path))?;
    tracing::debug!(
        "extracted {} entries from {} into {}",
        zip.len(),
        archive.path.display(),
        dest.path.display()
    );
    Ok(())
}
