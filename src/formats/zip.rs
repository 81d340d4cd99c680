//! Zip format plugin
//!
//! Zip keeps a central directory, so the cursor is an index into it and the
//! offset token is just that index. Several other formats are zip containers
//! under a different extension; they all mount under the same prefix.

use crate::error::{ArcfsError, Result};
use crate::reader::{ArchiveFormat, ArchiveReader, OffsetToken};
use crate::vfs::{VfsFile, VfsHandler};
use std::any::Any;
use std::io::Read;
use zip::ZipArchive;

const ZIP_EXTENSIONS: &[&str] = &[".zip", ".kmz", ".ods", ".xlsx"];

/// Zip container format, mounted at `/arczip`.
#[derive(Debug, Default)]
pub struct ZipFormat;

impl ArchiveFormat for ZipFormat {
    fn prefix(&self) -> &str {
        "/arczip"
    }

    fn extensions(&self) -> &[&str] {
        ZIP_EXTENSIONS
    }

    fn create_reader(
        &self,
        host: &dyn VfsHandler,
        archive_path: &str,
    ) -> Result<Box<dyn ArchiveReader>> {
        let stream = host.open(archive_path)?;
        let zip = ZipArchive::new(stream).map_err(|e| {
            ArcfsError::Reader(format!("cannot open zip archive {archive_path}: {e}"))
        })?;
        Ok(Box::new(ZipReader { zip, current: None }))
    }
}

/// Central-directory index of one entry.
#[derive(Debug)]
struct ZipOffset {
    index: usize,
}

impl OffsetToken for ZipOffset {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct CurrentEntry {
    index: usize,
    name: String,
    size: u64,
}

/// Cursor over a zip archive's central directory.
pub struct ZipReader {
    zip: ZipArchive<VfsFile>,
    current: Option<CurrentEntry>,
}

impl ZipReader {
    /// Position at `index`, caching the entry metadata the cursor reports.
    fn load(&mut self, index: usize) -> bool {
        if index >= self.zip.len() {
            return false;
        }
        match self.zip.by_index(index) {
            Ok(entry) => {
                self.current = Some(CurrentEntry {
                    index,
                    name: entry.name().to_string(),
                    size: entry.size(),
                });
                true
            }
            Err(_) => false,
        }
    }
}

impl ArchiveReader for ZipReader {
    fn goto_first_entry(&mut self) -> bool {
        self.load(0)
    }

    fn goto_next_entry(&mut self) -> bool {
        match &self.current {
            Some(current) => {
                let next = current.index + 1;
                self.load(next)
            }
            None => false,
        }
    }

    fn entry_name(&self) -> &str {
        self.current.as_ref().map_or("", |c| c.name.as_str())
    }

    fn entry_size(&self) -> u64 {
        self.current.as_ref().map_or(0, |c| c.size)
    }

    fn entry_offset(&mut self) -> Box<dyn OffsetToken> {
        Box::new(ZipOffset {
            index: self.current.as_ref().map_or(0, |c| c.index),
        })
    }

    fn goto_offset(&mut self, token: &dyn OffsetToken) -> bool {
        match token.as_any().downcast_ref::<ZipOffset>() {
            Some(token) => self.load(token.index),
            None => false,
        }
    }

    fn read_current(&mut self) -> Result<Vec<u8>> {
        let Some(current) = &self.current else {
            return Err(ArcfsError::Reader("zip cursor is not positioned".into()));
        };
        let mut entry = self.zip.by_index(current.index)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
