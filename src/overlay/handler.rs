//! The archive overlay filesystem handler
//!
//! Projects one archive format's containers as a directory tree under the
//! format's virtual prefix. Splitting decides where the archive file's own
//! path ends and the inner entry path begins; the content cache amortizes
//! the full-archive scan that every lookup relies on.

use crate::error::{ArcfsError, Result};
use crate::overlay::cache::ContentCache;
use crate::overlay::content::ArchiveContent;
use crate::overlay::path::normalize_inner_path;
use crate::reader::{ArchiveFormat, ArchiveReader};
use crate::vfs::{FileKind, FileStat, StdFs, VfsFile, VfsHandler, VFS_NAMESPACE};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Read-only virtual filesystem overlay for one archive format.
pub struct ArchiveOverlay {
    format: Box<dyn ArchiveFormat>,
    host: Arc<dyn VfsHandler>,
    cache: ContentCache,
}

impl ArchiveOverlay {
    /// Overlay resolving archive files against the physical filesystem.
    pub fn new(format: impl ArchiveFormat + 'static) -> Self {
        Self::with_host(format, Arc::new(StdFs))
    }

    /// Overlay resolving archive files against `host`.
    ///
    /// Passing a [`crate::vfs::VfsRouter`] as host lets archive paths chain
    /// through other mounted overlays.
    pub fn with_host(format: impl ArchiveFormat + 'static, host: Arc<dyn VfsHandler>) -> Self {
        Self {
            format: Box::new(format),
            host,
            cache: ContentCache::new(),
        }
    }

    /// Split a virtual path into (archive-file-path, normalized inner path).
    ///
    /// Scans left to right; at each position every recognized extension is
    /// tried, and the first candidate boundary naming an existing
    /// non-directory file wins. Later boundaries are not attempted once one
    /// is confirmed, which keeps chained prefixes unambiguous by preferring
    /// the outermost archive path that actually exists.
    pub fn split_path(&self, virtual_path: &str) -> Result<(String, String)> {
        let rest = virtual_path
            .strip_prefix(self.format.prefix())
            .ok_or_else(|| ArcfsError::NotFound(virtual_path.to_string()))?;

        // A chained virtual path keeps its own prefix intact; otherwise one
        // separator follows ours.
        let rest = if rest.starts_with(VFS_NAMESPACE) {
            rest
        } else {
            rest.strip_prefix('/').unwrap_or(rest)
        };

        for (pos, _) in rest.char_indices() {
            let suffix = &rest[pos..];
            let Some(ext_len) = self
                .format
                .extensions()
                .iter()
                .find(|ext| starts_with_ignore_ascii_case(suffix, ext))
                .map(|ext| ext.len())
            else {
                continue;
            };

            let boundary = pos + ext_len;
            let candidate = &rest[..boundary];

            let exists = self.cache.contains(candidate)
                || self
                    .host
                    .stat(candidate)
                    .map_or(false, |stat| !stat.is_directory());
            if !exists {
                continue;
            }

            let after = &rest[boundary..];
            let raw_inner = after
                .strip_prefix('/')
                .or_else(|| after.strip_prefix('\\'))
                .unwrap_or(after);
            let inner = normalize_inner_path(raw_inner);
            debug!(
                path = virtual_path,
                archive = candidate,
                inner = %inner,
                "split virtual path"
            );
            return Ok((candidate.to_string(), inner));
        }

        Err(ArcfsError::NotFound(virtual_path.to_string()))
    }

    /// Fetch the cached entry list for an archive, scanning it on first use.
    ///
    /// A supplied `reader` is borrowed for the scan instead of opening a
    /// fresh one (used when a cursor is already positioned in the archive).
    pub fn get_content(
        &self,
        archive_path: &str,
        reader: Option<&mut dyn ArchiveReader>,
    ) -> Result<Arc<ArchiveContent>> {
        self.cache.get_or_populate(archive_path, reader, || {
            self.format.create_reader(self.host.as_ref(), archive_path)
        })
    }

    /// Open an entry and return a reader positioned at it.
    ///
    /// An empty `inner` addresses "the archive itself": valid only for an
    /// archive holding a single real entry (one leading directory marker is
    /// tolerated and skipped). Anything more is ambiguous and fails with the
    /// full list of addressable paths so the caller can retry explicitly.
    pub fn open_entry(&self, archive_path: &str, inner: &str) -> Result<Box<dyn ArchiveReader>> {
        let mut reader = self.format.create_reader(self.host.as_ref(), archive_path)?;

        if inner.is_empty() {
            if !reader.goto_first_entry() {
                return Err(ArcfsError::NotFound(archive_path.to_string()));
            }

            let skipped_marker = {
                let name = reader.entry_name();
                name.ends_with('/') || name.ends_with('\\')
            };
            if skipped_marker && !reader.goto_next_entry() {
                return Err(ArcfsError::NotFound(archive_path.to_string()));
            }

            if reader.goto_next_entry() {
                // Multiple entries: enumerate them all for the caller,
                // reusing the already-open cursor for the scan.
                let candidates = match self.get_content(archive_path, Some(reader.as_mut())) {
                    Ok(content) => content
                        .entries()
                        .iter()
                        .map(|e| format!("{}/{}/{}", self.format.prefix(), archive_path, e.name))
                        .collect(),
                    Err(_) => Vec::new(),
                };
                return Err(ArcfsError::AmbiguousEntry {
                    archive: archive_path.to_string(),
                    candidates,
                });
            }

            // Re-home the cursor to the single candidate entry.
            if !reader.goto_first_entry() || (skipped_marker && !reader.goto_next_entry()) {
                return Err(ArcfsError::Reader(format!(
                    "cannot rewind archive {archive_path}"
                )));
            }
            return Ok(reader);
        }

        let content = self.get_content(archive_path, None)?;
        let entry = content
            .entry(inner)
            .ok_or_else(|| ArcfsError::NotFound(format!("{archive_path}/{inner}")))?;
        if entry.is_directory {
            return Err(ArcfsError::NotFound(format!("{archive_path}/{inner}")));
        }
        if !reader.goto_offset(entry.offset.as_ref()) {
            return Err(ArcfsError::Reader(format!(
                "cannot reposition to {inner} in {archive_path}"
            )));
        }
        Ok(reader)
    }
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

impl VfsHandler for ArchiveOverlay {
    fn prefix(&self) -> &str {
        self.format.prefix()
    }

    fn stat(&self, path: &str) -> Result<FileStat> {
        let (archive, inner) = self.split_path(path)?;

        if inner.is_empty() {
            // Shorthand form: stat reports the archive's single entry,
            // patched with its uncompressed size.
            let reader = self.open_entry(&archive, "")?;
            return Ok(FileStat {
                size: reader.entry_size(),
                kind: FileKind::File,
            });
        }

        let content = self.get_content(&archive, None)?;
        let entry = content
            .entry(&inner)
            .ok_or_else(|| ArcfsError::NotFound(path.to_string()))?;
        Ok(FileStat {
            size: entry.uncompressed_size,
            kind: if entry.is_directory {
                FileKind::Directory
            } else {
                FileKind::File
            },
        })
    }

    fn open(&self, path: &str) -> Result<VfsFile> {
        let (archive, inner) = self.split_path(path)?;
        let mut reader = self.open_entry(&archive, &inner)?;
        let bytes = reader.read_current()?;
        Ok(VfsFile::new(Cursor::new(bytes)))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let (archive, subdir) = self.split_path(path)?;
        let content = self.get_content(&archive, None)?;
        debug!(path = path, archive = %archive, subdir = %subdir, "read archive directory");

        let mut names: Vec<String> = Vec::new();
        for entry in content.entries() {
            let name = entry.name.as_str();
            let component = if subdir.is_empty() {
                // Only toplevel entries contribute to the root listing.
                if name.is_empty() || name.contains('/') {
                    continue;
                }
                name
            } else {
                let Some(below) = name
                    .strip_prefix(subdir.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
                else {
                    continue;
                };
                if below.is_empty() || below.contains('/') {
                    continue;
                }
                below
            };
            if !names.iter().any(|n| n == component) {
                names.push(component.to_string());
            }
        }
        Ok(names)
    }

    // The overlay is read-only: every mutation fails.

    fn unlink(&self, _path: &str) -> Result<()> {
        Err(ArcfsError::Unsupported("unlink"))
    }

    fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Err(ArcfsError::Unsupported("rename"))
    }

    fn mkdir(&self, _path: &str) -> Result<()> {
        Err(ArcfsError::Unsupported("mkdir"))
    }

    fn rmdir(&self, _path: &str) -> Result<()> {
        Err(ArcfsError::Unsupported("rmdir"))
    }
}
