//! Place uploaded files under an upload root.
//!
//! The request layer owns the upload batch and has already normalized it;
//! this module only decides where each item goes and moves it there.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::fs_op::create::{create_dir_all, sanitized_target};
use crate::fs_op::error::{FsOpError, FsResult};
use crate::fs_op::helpers::rename_or_copy;
use crate::fs_op::path::validate_path;

/// One uploaded file as handed over by the request layer.
#[derive(Debug, Clone, Default)]
pub struct UploadItem {
    pub original_name: String,
    /// Path relative to the upload root as sent by the client, e.g.
    /// `album/2024/cover.png` for a directory upload, or just the name.
    pub relative_subpath: String,
    pub mime_type_hint: Option<String>,
    pub source_temp_path: PathBuf,
    /// Transport status; anything other than zero means the upload broke.
    pub transport_error_code: i32,
}

impl UploadItem {
    pub fn new(original_name: impl Into<String>, source_temp_path: impl Into<PathBuf>) -> Self {
        let original_name = original_name.into();
        UploadItem {
            relative_subpath: original_name.clone(),
            original_name,
            source_temp_path: source_temp_path.into(),
            ..Default::default()
        }
    }

    fn extension(&self) -> Option<&str> {
        self.original_name.rsplit_once('.').map(|(_, ext)| ext)
    }

    // Directory part of `relative_subpath`, if it has one.
    fn subdirectory(&self) -> Option<&str> {
        self.relative_subpath
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
    }
}

/// Items that arrived through one form field.
#[derive(Debug, Clone, Default)]
pub struct UploadField {
    pub name: String,
    pub items: Vec<UploadItem>,
}

/// All items of one request, grouped by field, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub fields: Vec<UploadField>,
}

impl UploadBatch {
    pub fn items(&self) -> impl Iterator<Item = &UploadItem> {
        self.fields.iter().flat_map(|f| f.items.iter())
    }
}

impl From<Vec<UploadItem>> for UploadBatch {
    fn from(items: Vec<UploadItem>) -> Self {
        UploadBatch {
            fields: vec![UploadField {
                name: String::new(),
                items,
            }],
        }
    }
}

/// Per-item results of an upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub success: Vec<PathBuf>,
    pub fail: Vec<String>,
    pub denied: Vec<String>,
}

/// Move every item of `batch` under `upload_root`.
///
/// A missing root is created with its last component sanitized, and that
/// sanitized directory receives the files. With `rename_template` each
/// stored file is named `<template>_<n>.<ext>`, `n` counting from zero
/// across the whole batch. A non-empty `allowed_extensions` list denies
/// every other extension (compared ignoring ASCII case).
///
/// Only an invalid root fails the call; item problems are collected in the
/// returned [`UploadOutcome`].
pub fn upload<P: AsRef<Path>>(
    upload_root: P,
    batch: &UploadBatch,
    rename_template: Option<&str>,
    allowed_extensions: &[&str],
    force: bool,
) -> FsResult<UploadOutcome> {
    let root_desc = validate_path(upload_root, force)?;
    let root = if root_desc.path.is_dir() {
        root_desc.path.clone()
    } else {
        let target = sanitized_target(&root_desc);
        create_dir_all(&target)?;
        target
    };

    let mut outcome = UploadOutcome::default();
    let mut counter = 0usize;

    for item in batch.items() {
        let name = &item.original_name;

        let into = match item.subdirectory() {
            Some(sub) => match prepare_subdirectory(&root, sub, force) {
                Ok(dir) => dir,
                Err(e) => {
                    outcome.fail.push(format!("Error to upload the file '{name}': {e}"));
                    continue;
                }
            },
            None => root.clone(),
        };

        if item.transport_error_code != 0 {
            outcome.fail.push(format!(
                "Error to upload the file '{name}' (transport error {})",
                item.transport_error_code
            ));
            continue;
        }

        let ext = item.extension();
        if !allowed_extensions.is_empty()
            && !ext.is_some_and(|e| allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(e)))
        {
            outcome.denied.push(format!(
                "The file '{name}' can not be uploaded because the extension '{}' is not acceptable.",
                ext.unwrap_or_default()
            ));
            continue;
        }

        let file_name = match rename_template {
            Some(template) => {
                let n = counter;
                counter += 1;
                match ext {
                    Some(ext) => format!("{template}_{n}.{ext}"),
                    None => format!("{template}_{n}"),
                }
            }
            None => name.clone(),
        };
        if let Err(e) = check_leaf_name(&file_name, force) {
            outcome.fail.push(format!("Error to upload the file '{name}': {e}"));
            continue;
        }

        let destination = into.join(file_name);
        match rename_or_copy(&item.source_temp_path, &destination) {
            Ok(()) => {
                tracing::debug!("stored upload {} at {}", name, destination.display());
                outcome.success.push(destination);
            }
            Err(e) => {
                tracing::warn!("upload of {} failed: {}", name, e);
                outcome.fail.push(format!("Error to upload the file '{name}': {e}"));
            }
        }
    }

    Ok(outcome)
}

// A stored name must stay a single entry inside its directory.
fn check_leaf_name(file_name: &str, force: bool) -> FsResult<()> {
    validate_path(file_name, force)?;
    let mut comps = Path::new(file_name).components();
    let single = matches!(
        (comps.next(), comps.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || file_name.contains(['/', '\\']) {
        return Err(FsOpError::InvalidPath {
            path: file_name.to_string(),
            reason: "upload names must not contain directories".into(),
        });
    }
    Ok(())
}

fn prepare_subdirectory(root: &Path, sub: &str, force: bool) -> FsResult<PathBuf> {
    validate_path(sub, force)?;
    let dir = root.join(sub.trim_start_matches('/'));
    create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn staged(td: &TempDir, name: &str, body: &str) -> UploadItem {
        let tmp = td.path().join(format!("stage_{}", name.replace('/', "_")));
        fs::write(&tmp, body).unwrap();
        UploadItem::new(name, tmp)
    }

    #[test]
    fn stores_items_under_root() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("uploads");

        let batch = UploadBatch::from(vec![
            staged(&staging, "a.txt", "A"),
            staged(&staging, "b.png", "B"),
        ]);
        let out = upload(&root, &batch, None, &[], false).unwrap();

        assert_eq!(out.success, vec![root.join("a.txt"), root.join("b.png")]);
        assert!(out.fail.is_empty() && out.denied.is_empty());
        assert_eq!(fs::read_to_string(root.join("b.png")).unwrap(), "B");
    }

    #[test]
    fn missing_root_is_created_sanitized() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("Envios Ção");

        let batch = UploadBatch::from(vec![staged(&staging, "x.txt", "x")]);
        let out = upload(&root, &batch, None, &[], false).unwrap();

        let expected = td.path().join("envios cao");
        assert!(expected.is_dir());
        assert_eq!(out.success, vec![expected.join("x.txt")]);
    }

    #[test]
    fn failures_denials_and_renames_are_separated() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("inbox");

        let mut broken = staged(&staging, "broken.jpg", "?");
        broken.transport_error_code = 3;
        let batch = UploadBatch {
            fields: vec![
                UploadField {
                    name: "photos".into(),
                    items: vec![
                        staged(&staging, "one.JPG", "1"),
                        broken,
                        staged(&staging, "evil.exe", "!"),
                    ],
                },
                UploadField {
                    name: "more".into(),
                    items: vec![staged(&staging, "two.png", "2")],
                },
            ],
        };

        let out = upload(&root, &batch, Some("img"), &["jpg", "png"], false).unwrap();

        assert_eq!(out.success, vec![root.join("img_0.JPG"), root.join("img_1.png")]);
        assert_eq!(out.fail.len(), 1);
        assert!(out.fail[0].contains("broken.jpg"));
        assert_eq!(out.denied.len(), 1);
        assert!(out.denied[0].contains("'exe'"));
    }

    #[test]
    fn nested_subpaths_create_directories() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("drop");

        let mut item = staged(&staging, "cover.png", "c");
        item.relative_subpath = "album/2024/cover.png".into();
        let out = upload(&root, &UploadBatch::from(vec![item]), None, &[], false).unwrap();

        assert_eq!(out.success, vec![root.join("album/2024/cover.png")]);
        assert!(root.join("album/2024/cover.png").is_file());
    }

    #[test]
    fn names_cannot_leave_the_root() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("drop");
        let outside = td.path().join("outside.txt");
        let absolute = td.path().join("abs_target.txt");

        let batch = UploadBatch::from(vec![
            staged(&staging, "../outside.txt", "a"),
            staged(&staging, &absolute.display().to_string(), "b"),
            staged(&staging, "ok.txt", "c"),
        ]);
        let out = upload(&root, &batch, None, &[], false).unwrap();

        assert_eq!(out.success, vec![root.join("ok.txt")]);
        assert_eq!(out.fail.len(), 2);
        assert!(!outside.exists());
        assert!(!absolute.exists());

        // The traversal override does not let a name carry directories.
        let batch = UploadBatch::from(vec![staged(&staging, "../outside.txt", "a")]);
        let out = upload(&root, &batch, None, &[], true).unwrap();
        assert!(out.success.is_empty());
        assert_eq!(out.fail.len(), 1);
        assert!(!outside.exists());
    }

    #[test]
    fn template_with_separator_is_a_failure() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("drop");

        let batch = UploadBatch::from(vec![staged(&staging, "pic.png", "p")]);
        let out = upload(&root, &batch, Some("sub/img"), &[], false).unwrap();
        assert!(out.success.is_empty());
        assert_eq!(out.fail.len(), 1);
        assert!(!root.join("sub").exists());
    }

    #[test]
    fn traversal_in_subpath_is_a_per_item_failure() {
        let staging = tempdir().unwrap();
        let td = tempdir().unwrap();
        let root = td.path().join("drop");

        let mut item = staged(&staging, "x.txt", "x");
        item.relative_subpath = "../escape/x.txt".into();
        let ok = staged(&staging, "y.txt", "y");
        let out = upload(&root, &UploadBatch::from(vec![item, ok]), None, &[], false).unwrap();

        assert_eq!(out.fail.len(), 1);
        assert_eq!(out.success, vec![root.join("y.txt")]);
        assert!(!td.path().join("escape").exists());
    }
}
