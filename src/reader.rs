//! Contracts implemented by archive format plugins
//!
//! The overlay core never inspects archive bytes itself. Each supported
//! format supplies an [`ArchiveFormat`] describing where it mounts and which
//! file extensions it claims, plus an [`ArchiveReader`] cursor that walks one
//! archive's entries in storage order.

use crate::error::Result;
use crate::vfs::VfsHandler;
use std::any::Any;
use std::fmt;

/// Opaque positioning handle for one archive entry.
///
/// Not a byte offset in general: a format may need richer state to seek
/// directly to an entry (a central-directory index, a header ordinal). Each
/// format downcasts tokens it produced via [`OffsetToken::as_any`] and
/// rejects foreign ones.
pub trait OffsetToken: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Sequential cursor over one archive's entries.
///
/// Cursor methods return `false` instead of an error: an archive that cannot
/// be traversed is indistinguishable from an empty one at this layer.
/// Construction failures (corrupt header, I/O error) are reported by
/// [`ArchiveFormat::create_reader`] instead.
pub trait ArchiveReader: Send {
    /// Position the cursor at the first entry; false if the archive is empty.
    fn goto_first_entry(&mut self) -> bool;

    /// Advance to the next entry; false at the end of the archive.
    fn goto_next_entry(&mut self) -> bool;

    /// Raw name of the current entry as stored in the archive.
    ///
    /// May use `/` or `\` as separator and may end with a separator for
    /// directory entries. Empty when the cursor is not positioned.
    fn entry_name(&self) -> &str;

    /// Uncompressed size of the current entry in bytes.
    fn entry_size(&self) -> u64;

    /// Positioning token for the current entry; the caller takes ownership.
    fn entry_offset(&mut self) -> Box<dyn OffsetToken>;

    /// Reposition the cursor at a previously obtained entry; false if the
    /// token is invalid or was produced by another format.
    fn goto_offset(&mut self, token: &dyn OffsetToken) -> bool;

    /// Decompressed bytes of the current entry (empty for directory markers).
    fn read_current(&mut self) -> Result<Vec<u8>>;
}

/// Capability descriptor for one archive format, selected by the registry.
pub trait ArchiveFormat: Send + Sync {
    /// Virtual mount prefix, e.g. `/arczip`.
    fn prefix(&self) -> &str;

    /// Ordered list of recognized file extensions, matched case-insensitively
    /// at every candidate boundary during path splitting.
    fn extensions(&self) -> &[&str];

    /// Open `archive_path` through `host` and return a fresh cursor.
    ///
    /// `host` resolves the archive file itself, so a chained virtual path
    /// (an archive stored inside another overlay) opens transparently.
    fn create_reader(
        &self,
        host: &dyn VfsHandler,
        archive_path: &str,
    ) -> Result<Box<dyn ArchiveReader>>;
}
