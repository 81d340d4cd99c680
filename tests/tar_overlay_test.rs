//! End-to-end tests for the tar overlay against real archives on disk

use arcfs::{ArcfsError, ArchiveOverlay, FileKind, TarFormat, VfsHandler};
use std::io::Read;
use std::path::Path;
use tar::{Builder, EntryType, Header};

/// Helper: append one regular file to a tar builder
fn append_file(builder: &mut Builder<std::fs::File>, name: &str, data: &[u8]) {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, data).unwrap();
}

/// Helper: append one directory marker to a tar builder
fn append_dir(builder: &mut Builder<std::fs::File>, name: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::dir());
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, name, &[][..]).unwrap();
}

fn write_demo_tar(path: &Path) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = Builder::new(file);
    append_dir(&mut builder, "docs/");
    append_file(&mut builder, "docs/note.txt", b"twelve bytes");
    append_file(&mut builder, "top.bin", b"abc");
    builder.finish().unwrap();
}

fn vpath(archive: &Path, inner: &str) -> String {
    if inner.is_empty() {
        format!("/arctar/{}", archive.display())
    } else {
        format!("/arctar/{}/{}", archive.display(), inner)
    }
}

#[test]
fn test_stat_entries() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);

    let stat = overlay.stat(&vpath(&archive, "docs/note.txt")).unwrap();
    assert_eq!(stat.size, 12);
    assert_eq!(stat.kind, FileKind::File);

    let stat = overlay.stat(&vpath(&archive, "docs")).unwrap();
    assert_eq!(stat.kind, FileKind::Directory);

    assert!(matches!(
        overlay.stat(&vpath(&archive, "docs/absent")),
        Err(ArcfsError::NotFound(_))
    ));
}

#[test]
fn test_read_dir_levels() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);

    let mut root = overlay.read_dir(&vpath(&archive, "")).unwrap();
    root.sort();
    assert_eq!(root, vec!["docs".to_string(), "top.bin".to_string()]);

    let sub = overlay.read_dir(&vpath(&archive, "docs")).unwrap();
    assert_eq!(sub, vec!["note.txt".to_string()]);
}

#[test]
fn test_open_reads_entry_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);

    let mut stream = overlay.open(&vpath(&archive, "docs/note.txt")).unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"twelve bytes");
}

#[test]
fn test_shorthand_open_single_entry() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("single.tar");
    let file = std::fs::File::create(&archive).unwrap();
    let mut builder = Builder::new(file);
    append_file(&mut builder, "data.bin", b"only one");
    builder.finish().unwrap();

    let overlay = ArchiveOverlay::new(TarFormat);

    let stat = overlay.stat(&vpath(&archive, "")).unwrap();
    assert_eq!(stat.size, 8);
    assert_eq!(stat.kind, FileKind::File);

    let mut stream = overlay.open(&vpath(&archive, "")).unwrap();
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"only one");
}

#[test]
fn test_shorthand_open_multi_entry_is_ambiguous() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);
    assert!(matches!(
        overlay.open(&vpath(&archive, "")),
        Err(ArcfsError::AmbiguousEntry { .. })
    ));
}

#[test]
fn test_open_entry_positions_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);
    let archive_path = archive.display().to_string();

    let mut reader = overlay.open_entry(&archive_path, "top.bin").unwrap();
    assert_eq!(reader.entry_name(), "top.bin");
    assert_eq!(reader.read_current().unwrap(), b"abc");
}

#[test]
fn test_directory_entry_is_not_openable() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("demo.tar");
    write_demo_tar(&archive);

    let overlay = ArchiveOverlay::new(TarFormat);
    assert!(matches!(
        overlay.open(&vpath(&archive, "docs")),
        Err(ArcfsError::NotFound(_))
    ));
}
