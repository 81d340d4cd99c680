//! Per-archive entry-list cache
//!
//! One [`ArchiveContent`] exists per distinct archive path for the overlay's
//! lifetime; nothing is ever invalidated or evicted, since archive files are
//! assumed unmodified while mounted. The mutex guards only the map itself: a
//! slot in the `Populating` state makes concurrent callers of the same
//! archive wait on the condvar while unrelated archives populate in
//! parallel.

use crate::error::{ArcfsError, Result};
use crate::overlay::content::{ArchiveContent, ArchiveEntry};
use crate::overlay::path::normalize_entry_name;
use crate::reader::ArchiveReader;
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use tracing::{debug, trace};

enum Slot {
    Populating,
    Ready(Arc<ArchiveContent>),
}

/// Mapping from archive-file-path to its enumerated entry list.
#[derive(Default)]
pub struct ContentCache {
    slots: Mutex<HashMap<String, Slot>>,
    populated: Condvar,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the archive has a cache slot, complete or underway.
    ///
    /// Used as the cheap existence check during path splitting: a slot can
    /// only exist for an archive that was successfully opened.
    pub fn contains(&self, archive_path: &str) -> bool {
        self.slots
            .lock()
            .expect("content cache lock poisoned")
            .contains_key(archive_path)
    }

    /// Fetch the entry list for `archive_path`, traversing the archive at
    /// most once.
    ///
    /// A caller-supplied `reader` is only borrowed for the scan; when none is
    /// supplied, `create` provides a fresh one that is dropped afterwards.
    /// An archive whose traversal cannot start leaves no cache slot behind.
    pub fn get_or_populate(
        &self,
        archive_path: &str,
        reader: Option<&mut dyn ArchiveReader>,
        create: impl FnOnce() -> Result<Box<dyn ArchiveReader>>,
    ) -> Result<Arc<ArchiveContent>> {
        {
            let mut slots = self.slots.lock().expect("content cache lock poisoned");
            loop {
                match slots.get(archive_path) {
                    Some(Slot::Ready(content)) => return Ok(content.clone()),
                    Some(Slot::Populating) => {
                        slots = self
                            .populated
                            .wait(slots)
                            .expect("content cache lock poisoned");
                    }
                    None => {
                        slots.insert(archive_path.to_string(), Slot::Populating);
                        break;
                    }
                }
            }
        }

        // Scan outside the lock; the slot marker keeps it at-most-once.
        let outcome = scan_entries(archive_path, reader, create);

        let mut slots = self.slots.lock().expect("content cache lock poisoned");
        match outcome {
            Ok(content) => {
                let content = Arc::new(content);
                slots.insert(archive_path.to_string(), Slot::Ready(content.clone()));
                self.populated.notify_all();
                Ok(content)
            }
            Err(err) => {
                slots.remove(archive_path);
                self.populated.notify_all();
                Err(err)
            }
        }
    }
}

/// Full traversal of one archive into an entry list.
fn scan_entries(
    archive_path: &str,
    reader: Option<&mut dyn ArchiveReader>,
    create: impl FnOnce() -> Result<Box<dyn ArchiveReader>>,
) -> Result<ArchiveContent> {
    let mut created: Option<Box<dyn ArchiveReader>> = None;
    let reader: &mut dyn ArchiveReader = match reader {
        Some(reader) => reader,
        None => created.insert(create()?).as_mut(),
    };

    if !reader.goto_first_entry() {
        return Err(ArcfsError::NotFound(archive_path.to_string()));
    }

    let mut entries = Vec::new();
    loop {
        let raw = reader.entry_name().to_string();
        let is_directory = raw.ends_with('/') || raw.ends_with('\\');
        let entry = ArchiveEntry {
            name: normalize_entry_name(&raw),
            uncompressed_size: reader.entry_size(),
            is_directory,
            offset: reader.entry_offset(),
        };
        trace!(
            archive = archive_path,
            entry = %entry.name,
            size = entry.uncompressed_size,
            "enumerated archive entry"
        );
        entries.push(entry);
        if !reader.goto_next_entry() {
            break;
        }
    }

    debug!(
        archive = archive_path,
        entries = entries.len(),
        "archive content cached"
    );
    Ok(ArchiveContent::new(entries))
}
