//! Resolve what should be streamed to a client downloading a path.
//!
//! The HTTP side (writing headers, streaming the body, ending the request)
//! belongs to the host layer; this module only decides which file holds the
//! bytes and whether that file is a transient archive to clean up.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::fs_op::archive::zip_dir;
use crate::fs_op::error::{io_err, FsOpError, FsResult};
use crate::fs_op::helpers::temp_suffix;
use crate::fs_op::path::validate_path;
use crate::fs_op::stat::exists_as;

const STAGING_PREFIX: &str = ".download.";

/// A resolved download: the file to stream and how to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSource {
    pub path: PathBuf,
    pub download_name: String,
    pub content_length: u64,
    pub delete_after_send: bool,
    // Private directory holding a transient archive.
    staging_dir: Option<PathBuf>,
}

impl DownloadSource {
    /// Headers a host layer would send ahead of the body.
    pub fn attachment_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Description", "File Transfer".into()),
            ("Content-Type", "application/octet-stream".into()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.download_name),
            ),
            ("Expires", "0".into()),
            ("Cache-Control", "must-revalidate".into()),
            ("Pragma", "public".into()),
            ("Content-Length", self.content_length.to_string()),
        ]
    }

    /// Stream the file into `out`, then clean up.
    ///
    /// Cleanup also runs when streaming fails, so a transient archive never
    /// outlives the request.
    pub fn send_to<W: Write>(self, out: &mut W) -> FsResult<u64> {
        let sent = File::open(&self.path)
            .and_then(|mut f| io::copy(&mut f, out))
            .map_err(io_err("send", &self.path));
        self.cleanup()?;
        sent
    }

    /// Remove the transient archive, if this download created one.
    pub fn cleanup(self) -> FsResult<()> {
        if self.delete_after_send && self.path.is_file() {
            fs::remove_file(&self.path).map_err(io_err("delete the file", &self.path))?;
            tracing::debug!("removed transient archive {}", self.path.display());
        }
        if let Some(dir) = &self.staging_dir {
            if dir.is_dir() {
                fs::remove_dir(dir).map_err(io_err("remove the directory", dir))?;
            }
        }
        Ok(())
    }
}

/// Resolve `path` into a [`DownloadSource`].
///
/// Files are served as they are. Directories are zipped next to themselves
/// as `<basename>.zip`, inside a private hidden directory of their parent so
/// an existing file of that name is never overwritten. The archive and its
/// directory are flagged for removal after sending.
pub fn download<P: AsRef<Path>>(path: P, force: bool) -> FsResult<DownloadSource> {
    let desc = validate_path(path, force)?;
    if !exists_as(&desc) {
        return Err(FsOpError::NotFound(desc.path));
    }

    let (path, download_name, staging_dir) = if desc.is_directory() {
        // The staging directory sits beside the source, which may itself
        // need the traversal override (for example `a/..`), so the zip step
        // is forced.
        let staging = desc
            .parent()
            .join(format!("{STAGING_PREFIX}{}", temp_suffix()));
        let archive = match zip_dir(&desc.path, &staging, true) {
            Ok(archive) => archive,
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                return Err(e);
            }
        };
        (archive, format!("{}.zip", desc.basename), Some(staging))
    } else {
        (desc.path.clone(), desc.basename.clone(), None)
    };

    let content_length = fs::metadata(&path)
        .map_err(io_err("read metadata of", &path))?
        .len();
    Ok(DownloadSource {
        path,
        download_name,
        content_length,
        delete_after_send: staging_dir.is_some(),
        staging_dir,
    })
}
