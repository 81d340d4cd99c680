//! Chained overlay tests: archives stored inside other archives
//!
//! A zip inside a tar is addressed by chaining the zip prefix over the tar
//! path; the router resolves the outer archive for the inner overlay.

use arcfs::{ArchiveOverlay, FileKind, TarFormat, VfsHandler, VfsRouter, ZipFormat};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Helper: zip bytes holding a single text file
fn inner_zip_bytes() -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("file.txt", FileOptions::default())
        .unwrap();
    writer.write_all(b"hello from the inner zip").unwrap();
    writer.finish().unwrap().into_inner()
}

/// Helper: write a tar on disk containing `inner.zip`
fn write_bundle_tar(path: &Path, zip_bytes: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(file);
    let mut header = tar::Header::new_gnu();
    header.set_size(zip_bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "inner.zip", zip_bytes)
        .unwrap();
    builder.finish().unwrap();
}

/// Helper: router with both overlays mounted and chained through it
fn archive_router() -> Arc<VfsRouter> {
    let router = VfsRouter::new();
    router.mount(Arc::new(ArchiveOverlay::with_host(
        ZipFormat,
        router.clone(),
    )));
    router.mount(Arc::new(ArchiveOverlay::with_host(
        TarFormat,
        router.clone(),
    )));
    router
}

fn chained_path(bundle: &Path, inner: &str) -> String {
    // The zip prefix chains directly over the tar path; the archive file
    // for the zip overlay is itself a virtual tar path.
    format!("/arczip/arctar/{}/inner.zip/{}", bundle.display(), inner)
        .trim_end_matches('/')
        .to_string()
}

fn bundle_on_disk() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle.tar");
    write_bundle_tar(&bundle, &inner_zip_bytes());
    (dir, bundle)
}

#[test]
fn test_stat_through_chain() {
    let (_dir, bundle) = bundle_on_disk();
    let router = archive_router();

    let stat = router.stat(&chained_path(&bundle, "file.txt")).unwrap();
    assert_eq!(stat.size, 24);
    assert_eq!(stat.kind, FileKind::File);
}

#[test]
fn test_read_dir_through_chain() {
    let (_dir, bundle) = bundle_on_disk();
    let router = archive_router();

    let names = router.read_dir(&chained_path(&bundle, "")).unwrap();
    assert_eq!(names, vec!["file.txt".to_string()]);
}

#[test]
fn test_open_through_chain() {
    let (_dir, bundle) = bundle_on_disk();
    let router = archive_router();

    let mut stream = router.open(&chained_path(&bundle, "file.txt")).unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"hello from the inner zip");
}

#[test]
fn test_tar_level_still_lists_the_zip() {
    let (_dir, bundle) = bundle_on_disk();
    let router = archive_router();

    let names = router
        .read_dir(&format!("/arctar/{}", bundle.display()))
        .unwrap();
    assert_eq!(names, vec!["inner.zip".to_string()]);
}

#[test]
fn test_router_still_reaches_physical_files() {
    let (dir, _bundle) = bundle_on_disk();
    let plain = dir.path().join("plain.txt");
    std::fs::write(&plain, b"plain").unwrap();

    let router = archive_router();
    let stat = router.stat(plain.to_str().unwrap()).unwrap();
    assert_eq!(stat.size, 5);
}
