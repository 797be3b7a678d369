//! Integration tests for scan directory loading and file copies.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use pairset_adapters::{list_images, FsFileStore, FsImageSource};
use pairset_core::ports::FileStore;
use pairset_core::{CurationError, ImageSource};
use pairset_test_support::ScanBuilder;
use tempfile::TempDir;

fn scan_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        ScanBuilder::save(&ScanBuilder::document_page(name), dir.path()).unwrap();
    }
    dir
}

#[test]
fn test_load_supported_formats() {
    let dir = scan_dir(&["a.png", "b.jpg", "c.bmp", "d.tiff"]);
    let source = FsImageSource::new(dir.path()).unwrap();

    assert_eq!(source.count_hint(), Some(4));
    for result in source.images() {
        let info = result.expect("all scans should load");
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 64);
        assert!(info.path.starts_with(&*dir.path().to_string_lossy()));
    }
}

#[test]
fn test_images_yield_in_filename_order() {
    let dir = scan_dir(&["c.png", "a.png", "b.png"]);
    let source = FsImageSource::new(dir.path()).unwrap();

    let names: Vec<String> = source.images().map(|r| r.unwrap().filename).collect();
    assert_eq!(names, ["a.png", "b.png", "c.png"]);
}

#[test]
fn test_listing_skips_other_files_and_subdirectories() {
    let dir = scan_dir(&["a.png", "B.PNG"]);
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::create_dir(dir.path().join("nested.png")).unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    ScanBuilder::save(
        &ScanBuilder::document_page("deep.png"),
        &dir.path().join("sub"),
    )
    .unwrap();

    let names = list_images(dir.path()).unwrap();
    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        ["B.PNG", "a.png"]
    );
}

#[test]
fn test_corrupt_file_is_unreadable_not_fatal() {
    let dir = scan_dir(&["a.png", "c.png"]);
    ScanBuilder::save_corrupt("b.jpg", dir.path()).unwrap();

    let source = FsImageSource::new(dir.path()).unwrap();
    let results: Vec<_> = source.images().collect();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    match &results[1] {
        Err(CurationError::UnreadableImage { path, .. }) => assert!(path.ends_with("b.jpg")),
        other => panic!("expected unreadable image, got {other:?}"),
    }
    assert!(results[2].is_ok());
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(FsImageSource::new(&missing).is_err());
    assert!(list_images(&missing).is_err());
}

#[test]
fn test_file_store_copy_keeps_source() {
    let src = scan_dir(&["a.png"]);
    let out = TempDir::new().unwrap();
    let store = FsFileStore;

    let target_dir = out.path().join("train").join("front");
    store.create_dir_all(&target_dir).unwrap();
    store
        .copy(&src.path().join("a.png"), &target_dir.join("a.png"))
        .unwrap();

    assert!(store.exists(&src.path().join("a.png")));
    assert!(store.exists(&target_dir.join("a.png")));
    assert_eq!(
        std::fs::read(src.path().join("a.png")).unwrap(),
        std::fs::read(target_dir.join("a.png")).unwrap()
    );
}

#[test]
fn test_file_store_copy_missing_source_fails() {
    let out = TempDir::new().unwrap();
    let store = FsFileStore;
    let err = store
        .copy(Path::new("/definitely/not/here.png"), &out.path().join("x.png"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("here.png"));
    assert!(!store.exists(&out.path().join("x.png")));
}

#[cfg(target_os = "linux")]
mod non_utf8_names {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    use pairset_adapters::{unkeyed_images, NON_UTF8_REASON};
    use pairset_core::SkipKind;

    use super::*;

    /// Scan directory with `a.png` and a copy under a Latin-1 name.
    fn mixed_dir() -> TempDir {
        let dir = scan_dir(&["a.png"]);
        let latin1 = OsStr::from_bytes(b"caf\xe9.png");
        std::fs::copy(dir.path().join("a.png"), dir.path().join(latin1)).unwrap();
        dir
    }

    #[test]
    fn test_listing_leaves_out_non_utf8_names() {
        let dir = mixed_dir();
        let names: Vec<String> = list_images(dir.path()).unwrap().into_iter().collect();
        assert_eq!(names, ["a.png"]);
    }

    #[test]
    fn test_non_utf8_names_become_skip_entries() {
        let dir = mixed_dir();
        let skipped = unkeyed_images(dir.path()).unwrap();

        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].kind, SkipKind::UnreadableImage);
        assert_eq!(skipped[0].reason, NON_UTF8_REASON);
        assert!(skipped[0].path.contains("caf"));
    }

    #[test]
    fn test_image_source_yields_non_utf8_names_as_errors() {
        let dir = mixed_dir();
        let source = FsImageSource::new(dir.path()).unwrap();
        assert_eq!(source.count_hint(), Some(2));

        let results: Vec<_> = source.images().collect();
        assert_eq!(results[0].as_ref().unwrap().filename, "a.png");
        assert!(matches!(
            &results[1],
            Err(CurationError::UnreadableImage { reason, .. }) if reason == NON_UTF8_REASON
        ));
    }
}
