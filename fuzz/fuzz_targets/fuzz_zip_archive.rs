#![no_main]

use arcfs::{ArcfsError, ArchiveFormat, FileKind, FileStat, Result, VfsFile, VfsHandler, ZipFormat};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

/// Host serving one in-memory file under a fixed name.
struct BytesHost {
    bytes: Vec<u8>,
}

impl VfsHandler for BytesHost {
    fn prefix(&self) -> &str {
        ""
    }
    fn stat(&self, path: &str) -> Result<FileStat> {
        if path == "fuzz.zip" {
            Ok(FileStat {
                size: self.bytes.len() as u64,
                kind: FileKind::File,
            })
        } else {
            Err(ArcfsError::NotFound(path.to_string()))
        }
    }
    fn open(&self, path: &str) -> Result<VfsFile> {
        if path == "fuzz.zip" {
            Ok(VfsFile::new(Cursor::new(self.bytes.clone())))
        } else {
            Err(ArcfsError::NotFound(path.to_string()))
        }
    }
    fn read_dir(&self, _path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fuzz_target!(|data: &[u8]| {
    let host = BytesHost {
        bytes: data.to_vec(),
    };

    // Opening arbitrary bytes must fail cleanly or yield a walkable cursor;
    // nothing here may panic.
    let Ok(mut reader) = ZipFormat.create_reader(&host, "fuzz.zip") else {
        return;
    };

    if !reader.goto_first_entry() {
        return;
    }
    loop {
        let _ = reader.entry_name();
        let _ = reader.entry_size();
        let _ = reader.read_current();
        let token = reader.entry_offset();
        let _ = reader.goto_offset(token.as_ref());
        if !reader.goto_next_entry() {
            break;
        }
    }
});
