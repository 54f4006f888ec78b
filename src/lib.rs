//! Safer, higher-level filesystem operations: existence checks, recursive
//! create/copy/move/delete, uploads and downloads, permissions, metadata,
//! size formatting and zip archives, all reporting failures as
//! [`FsOpError`] values.

pub mod fs_op;

pub use crate::fs_op::files::*;
