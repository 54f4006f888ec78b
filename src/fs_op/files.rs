//! The single entry point to every filesystem operation.
//!
//! Each operation lives in a focused submodule (`create`, `copy`, `mv`,
//! `remove`, `stat`, `archive`, ...). This module gathers them into one
//! flat surface, also re-exported at the crate root, so callers can write
//! `ezfs::copy_path(..)` without caring where it is implemented.
//!
//! Every operation takes a trailing `force` flag. Without it any path
//! containing `..` is refused with an access-denied error.

/// Path validation and lexical classification.
pub use crate::fs_op::path::{classify, validate_path, PathDescriptor, PathKind};

/// Existence, listing and size.
pub use crate::fs_op::stat::{exists, list, path_size};

/// Create, copy, move/rename and delete.
pub use crate::fs_op::copy::copy_path;
pub use crate::fs_op::create::create;
pub use crate::fs_op::mv::{move_path, rename_path};
pub use crate::fs_op::remove::delete_path;

/// Whole-file content helpers.
pub use crate::fs_op::content::{read_file, write_file};

/// Permissions and descriptive metadata.
pub use crate::fs_op::metadata::{change_permissions, path_info, PathInfo};

/// Zip archives.
pub use crate::fs_op::archive::{unzip, zip_dir};

/// Uploads and downloads.
pub use crate::fs_op::download::{download, DownloadSource};
pub use crate::fs_op::upload::{upload, UploadBatch, UploadField, UploadItem, UploadOutcome};

/// Size formatting and name sanitizing.
pub use crate::fs_op::sanitize::sanitize_name;
pub use crate::fs_op::units::{format_size, SizeUnit};

/// Error types.
pub use crate::fs_op::error::{ErrorKind, FsOpError, FsResult};
