//! Tar format plugin
//!
//! Tar has no central directory, so the whole header chain is walked once at
//! construction and the cursor runs over the in-memory index. Reading an
//! entry seeks the raw stream to the data offset recorded during that scan,
//! which keeps PAX/GNU long names correct without re-parsing headers.
//!
//! Plain `.tar` only; compressed tarballs would need a decompression layer
//! in front of the stream.

use crate::error::{ArcfsError, Result};
use crate::reader::{ArchiveFormat, ArchiveReader, OffsetToken};
use crate::vfs::{VfsFile, VfsHandler};
use std::any::Any;
use std::io::{Read, Seek, SeekFrom};
use tar::Archive;

const TAR_EXTENSIONS: &[&str] = &[".tar"];

/// Tar container format, mounted at `/arctar`.
#[derive(Debug, Default)]
pub struct TarFormat;

impl ArchiveFormat for TarFormat {
    fn prefix(&self) -> &str {
        "/arctar"
    }

    fn extensions(&self) -> &[&str] {
        TAR_EXTENSIONS
    }

    fn create_reader(
        &self,
        host: &dyn VfsHandler,
        archive_path: &str,
    ) -> Result<Box<dyn ArchiveReader>> {
        let stream = host.open(archive_path)?;
        let reader = TarReader::open(stream, archive_path)?;
        Ok(Box::new(reader))
    }
}

/// Ordinal plus raw data offset of one entry.
#[derive(Debug)]
struct TarOffset {
    ordinal: usize,
    data_pos: u64,
}

impl OffsetToken for TarOffset {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct TarEntryMeta {
    name: String,
    size: u64,
    data_pos: u64,
}

/// Cursor over a tar archive's header chain.
pub struct TarReader {
    stream: VfsFile,
    entries: Vec<TarEntryMeta>,
    cursor: Option<usize>,
}

impl TarReader {
    fn open(mut stream: VfsFile, archive_path: &str) -> Result<Self> {
        stream.seek(SeekFrom::Start(0))?;
        let mut archive = Archive::new(stream);

        let mut entries = Vec::new();
        let iter = archive.entries().map_err(|e| {
            ArcfsError::Reader(format!("cannot read tar archive {archive_path}: {e}"))
        })?;
        for entry in iter {
            let entry = entry.map_err(|e| {
                ArcfsError::Reader(format!("corrupt tar entry in {archive_path}: {e}"))
            })?;
            let mut name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            if entry.header().entry_type().is_dir() && !name.ends_with('/') {
                name.push('/');
            }
            entries.push(TarEntryMeta {
                name,
                size: entry.size(),
                data_pos: entry.raw_file_position(),
            });
        }

        Ok(Self {
            stream: archive.into_inner(),
            entries,
            cursor: None,
        })
    }

    fn meta(&self) -> Option<&TarEntryMeta> {
        self.cursor.and_then(|pos| self.entries.get(pos))
    }
}

impl ArchiveReader for TarReader {
    fn goto_first_entry(&mut self) -> bool {
        if self.entries.is_empty() {
            false
        } else {
            self.cursor = Some(0);
            true
        }
    }

    fn goto_next_entry(&mut self) -> bool {
        match self.cursor {
            Some(pos) if pos + 1 < self.entries.len() => {
                self.cursor = Some(pos + 1);
                true
            }
            _ => false,
        }
    }

    fn entry_name(&self) -> &str {
        self.meta().map_or("", |m| m.name.as_str())
    }

    fn entry_size(&self) -> u64 {
        self.meta().map_or(0, |m| m.size)
    }

    fn entry_offset(&mut self) -> Box<dyn OffsetToken> {
        let (ordinal, data_pos) = self
            .cursor
            .map_or((0, 0), |pos| (pos, self.entries[pos].data_pos));
        Box::new(TarOffset { ordinal, data_pos })
    }

    fn goto_offset(&mut self, token: &dyn OffsetToken) -> bool {
        match token.as_any().downcast_ref::<TarOffset>() {
            Some(token)
                if self
                    .entries
                    .get(token.ordinal)
                    .map_or(false, |m| m.data_pos == token.data_pos) =>
            {
                self.cursor = Some(token.ordinal);
                true
            }
            _ => false,
        }
    }

    fn read_current(&mut self) -> Result<Vec<u8>> {
        let Some(pos) = self.cursor else {
            return Err(ArcfsError::Reader("tar cursor is not positioned".into()));
        };
        let meta = &self.entries[pos];
        if meta.name.ends_with('/') {
            return Ok(Vec::new());
        }
        self.stream.seek(SeekFrom::Start(meta.data_pos))?;
        let mut bytes = Vec::new();
        let read = (&mut self.stream).take(meta.size).read_to_end(&mut bytes)?;
        if (read as u64) < meta.size {
            return Err(ArcfsError::Reader(format!(
                "truncated tar entry {}",
                meta.name
            )));
        }
        Ok(bytes)
    }
}
