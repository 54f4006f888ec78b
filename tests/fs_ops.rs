use std::fs;

use tempfile::tempdir;

use ezfs::{ErrorKind, PathKind, SizeUnit, UploadBatch, UploadItem};

// Copying a tree and deleting the original leaves an identical tree behind.
#[test]
fn copy_then_delete_keeps_the_copy() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("album");
    fs::create_dir_all(src.join("2023/summer"))?;
    fs::write(src.join("cover.jpg"), b"jpeg")?;
    fs::write(src.join("2023/summer/beach.png"), b"png")?;

    let dst = tmp.path().join("backup");
    ezfs::copy_path(&src, &dst, false)?;
    ezfs::delete_path(&src, false)?;

    assert!(!ezfs::exists(&src, false)?);
    assert_eq!(fs::read(dst.join("cover.jpg"))?, b"jpeg");
    assert_eq!(fs::read(dst.join("2023/summer/beach.png"))?, b"png");
    assert_eq!(ezfs::path_size(&dst, false)?, 7);

    Ok(())
}

// A moved tree shows up under its new name and the old name is gone.
#[test]
fn move_relocates_whole_tree() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("drafts");
    fs::create_dir_all(src.join("old"))?;
    fs::write(src.join("old/a.txt"), "a")?;

    let dst = tmp.path().join("archive/drafts");
    ezfs::move_path(&src, &dst, false)?;

    assert!(!src.exists(), "source should be gone after move");
    assert_eq!(fs::read_to_string(dst.join("old/a.txt"))?, "a");

    Ok(())
}

#[test]
fn zip_and_unzip_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let src = tmp.path().join("site");
    fs::create_dir_all(src.join("css"))?;
    fs::write(src.join("index.html"), "<html></html>")?;
    fs::write(src.join("css/main.css"), "body{}")?;

    let archive = ezfs::zip_dir(&src, tmp.path().join("dist"), false)?;
    assert_eq!(archive.file_name().and_then(|n| n.to_str()), Some("site.zip"));

    let restored = tmp.path().join("restored");
    ezfs::unzip(&archive, &restored, false)?;
    assert_eq!(fs::read_to_string(restored.join("index.html"))?, "<html></html>");
    assert_eq!(fs::read_to_string(restored.join("css/main.css"))?, "body{}");

    Ok(())
}

#[test]
fn create_twice_is_idempotent_and_delete_twice_is_not() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("notes/today.txt");

    ezfs::create(&file, false, false)?;
    ezfs::create(&file, false, false)?;
    assert!(ezfs::exists(&file, false)?);

    ezfs::delete_path(&file, false)?;
    let err = ezfs::delete_path(&file, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

// Every operation refuses `..` unless forced, before touching the disk.
#[test]
fn traversal_is_denied_everywhere_without_force() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let inside = tmp.path().join("inside");
    fs::create_dir(&inside)?;
    let sneaky = inside.join("../escaped");

    let denied = [
        ezfs::exists(&sneaky, false).map(|_| ()),
        ezfs::create(&sneaky, false, false),
        ezfs::copy_path(&inside, &sneaky, false),
        ezfs::move_path(&inside, &sneaky, false),
        ezfs::delete_path(&sneaky, false),
        ezfs::zip_dir(&inside, &sneaky, false).map(|_| ()),
    ];
    for res in denied {
        assert_eq!(res.unwrap_err().kind(), ErrorKind::AccessDenied);
    }
    assert!(!tmp.path().join("escaped").exists());

    ezfs::create(&sneaky, false, true)?;
    assert!(tmp.path().join("escaped").is_dir());

    Ok(())
}

#[test]
fn classification_ignores_the_disk() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let odd = tmp.path().join("version.d");
    fs::create_dir(&odd)?;

    assert_eq!(ezfs::classify(&odd)?, PathKind::File);
    assert!(!ezfs::exists(&odd, false)?, "a directory named like a file does not exist as a file");
    assert_eq!(ezfs::classify(tmp.path().join("Makefile"))?, PathKind::Directory);

    Ok(())
}

#[test]
fn upload_reports_every_item() -> Result<(), Box<dyn std::error::Error>> {
    let staging = tempdir()?;
    let tmp = tempdir()?;
    let root = tmp.path().join("Uploads");

    let good = staging.path().join("upload_1");
    let bad = staging.path().join("upload_2");
    fs::write(&good, "ok")?;
    fs::write(&bad, "nope")?;

    let batch = UploadBatch::from(vec![
        UploadItem::new("Photo.PNG", &good),
        UploadItem::new("script.sh", &bad),
    ]);
    let out = ezfs::upload(&root, &batch, None, &["png"], false)?;

    let stored = tmp.path().join("uploads").join("Photo.PNG");
    assert_eq!(out.success, vec![stored.clone()]);
    assert_eq!(out.denied.len(), 1);
    assert!(out.fail.is_empty());
    assert_eq!(fs::read_to_string(stored)?, "ok");
    assert!(bad.exists(), "denied items are left where they were");

    Ok(())
}

#[test]
fn size_formatting_matches_documented_examples() {
    assert_eq!(ezfs::format_size(1, SizeUnit::GB, false), "1 GB");
    assert_eq!(ezfs::format_size(10, SizeUnit::TB, false), "10 TB");
    assert_eq!(ezfs::format_size(1, SizeUnit::TB, true), "1099511627776 B");
    assert_eq!(ezfs::format_size(100, SizeUnit::B, false), "100 B");
}

#[test]
fn copy_onto_itself_is_harmless() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let file = tmp.path().join("keep.txt");
    fs::write(&file, "precious")?;
    let dir = tmp.path().join("box");
    fs::create_dir(&dir)?;
    fs::write(dir.join("inside.txt"), "also precious")?;

    ezfs::copy_path(&file, &file, false)?;
    ezfs::copy_path(&dir, &dir, false)?;

    assert_eq!(fs::read_to_string(&file)?, "precious");
    assert_eq!(fs::read_to_string(dir.join("inside.txt"))?, "also precious");

    Ok(())
}

// A copy of a tree holding a symlinked file survives deleting the original.
#[cfg(unix)]
#[test]
fn copy_of_linked_file_survives_original_delete() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::symlink;

    let tmp = tempdir()?;
    let real = tmp.path().join("real.txt");
    fs::write(&real, "shared")?;
    let src = tmp.path().join("src");
    fs::create_dir(&src)?;
    symlink(&real, src.join("link.txt"))?;

    let dst = tmp.path().join("dst");
    ezfs::copy_path(&src, &dst, false)?;
    ezfs::delete_path(&src, false)?;
    fs::remove_file(&real)?;

    assert_eq!(fs::read_to_string(dst.join("link.txt"))?, "shared");
    assert_eq!(ezfs::path_size(&dst, false)?, 6);

    Ok(())
}

#[test]
fn upload_names_stay_inside_root() -> Result<(), Box<dyn std::error::Error>> {
    let staging = tempdir()?;
    let tmp = tempdir()?;
    let root = tmp.path().join("inbox");
    fs::create_dir(&root)?;

    let first = staging.path().join("upload_1");
    let second = staging.path().join("upload_2");
    fs::write(&first, "1")?;
    fs::write(&second, "2")?;
    let absolute = tmp.path().join("abs_target.txt");

    let batch = UploadBatch::from(vec![
        UploadItem::new("../outside.txt", &first),
        UploadItem::new(absolute.display().to_string(), &second),
    ]);
    let out = ezfs::upload(&root, &batch, None, &[], false)?;

    assert!(out.success.is_empty());
    assert_eq!(out.fail.len(), 2);
    assert!(!tmp.path().join("outside.txt").exists());
    assert!(!absolute.exists());

    Ok(())
}
