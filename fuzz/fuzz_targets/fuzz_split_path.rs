#![no_main]

use arcfs::{
    ArcfsError, ArchiveFormat, ArchiveOverlay, ArchiveReader, FileKind, FileStat, Result, VfsFile,
    VfsHandler,
};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct NoArchives;

impl ArchiveFormat for NoArchives {
    fn prefix(&self) -> &str {
        "/arczip"
    }
    fn extensions(&self) -> &[&str] {
        &[".zip", ".kmz"]
    }
    fn create_reader(
        &self,
        _host: &dyn VfsHandler,
        archive_path: &str,
    ) -> Result<Box<dyn ArchiveReader>> {
        Err(ArcfsError::Reader(format!("no reader for {archive_path}")))
    }
}

/// Host on which every candidate boundary exists, so the splitter always
/// reaches the inner-path normalization branch.
struct EverythingExists;

impl VfsHandler for EverythingExists {
    fn prefix(&self) -> &str {
        ""
    }
    fn stat(&self, _path: &str) -> Result<FileStat> {
        Ok(FileStat {
            size: 0,
            kind: FileKind::File,
        })
    }
    fn open(&self, path: &str) -> Result<VfsFile> {
        Err(ArcfsError::NotFound(path.to_string()))
    }
    fn read_dir(&self, _path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fuzz_target!(|data: &str| {
    let overlay = ArchiveOverlay::with_host(NoArchives, Arc::new(EverythingExists));

    // Splitting must never panic, and a successful split must be idempotent.
    if let Ok(first) = overlay.split_path(data) {
        let second = overlay.split_path(data).expect("second split must succeed");
        assert_eq!(first, second);
    }
});
