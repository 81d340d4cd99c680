//! Cached view of one archive's entry list

use crate::reader::OffsetToken;

/// One record inside a parsed archive
#[derive(Debug)]
pub struct ArchiveEntry {
    /// Normalized inner path: forward-slash separated, no trailing separator.
    pub name: String,
    /// Logical (decompressed) byte length.
    pub uncompressed_size: u64,
    /// True if the raw entry name ended with a path separator.
    pub is_directory: bool,
    /// Positioning token owned by this entry, released with the entry list.
    pub offset: Box<dyn OffsetToken>,
}

/// Ordered entry list for one archive file.
///
/// Insertion order is the traversal order reported by the archive reader.
/// Immutable once built; archive formats may report duplicate names, in
/// which case the first occurrence wins on lookup.
#[derive(Debug, Default)]
pub struct ArchiveContent {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveContent {
    pub(crate) fn new(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    /// Exact-match lookup by normalized name; first match wins.
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
