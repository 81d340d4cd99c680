//! Filesystem-handler surface and prefix registry
//!
//! [`VfsHandler`] is the operation surface every handler exposes: the archive
//! overlays implement it, [`StdFs`] implements it over the physical
//! filesystem, and [`VfsRouter`] implements it by dispatching to whichever
//! mounted handler claims the path's prefix. An overlay constructed with the
//! router as its host resolves chained virtual paths transparently.

use crate::error::{ArcfsError, Result};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::{Arc, RwLock};

/// Namespace marker shared by every virtual mount prefix.
///
/// When the remainder of a path after one overlay prefix starts with this
/// marker again, the path chains into another overlay without a redundant
/// separator (e.g. `/arczip/arctar/bundle.tar/inner.zip/file.txt`).
pub const VFS_NAMESPACE: &str = "/arc";

/// Kind of a file reported by stat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

/// Stat result for a virtual or physical path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub kind: FileKind,
}

impl FileStat {
    pub fn is_directory(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

trait FileStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> FileStream for T {}

/// Readable, seekable byte stream returned by [`VfsHandler::open`]
pub struct VfsFile {
    inner: Box<dyn FileStream>,
}

impl VfsFile {
    pub fn new(stream: impl Read + Seek + Send + 'static) -> Self {
        Self {
            inner: Box::new(stream),
        }
    }
}

impl Read for VfsFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for VfsFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Operation surface of one filesystem handler.
///
/// The overlay is read-only, so the mutation operations default to
/// [`ArcfsError::Unsupported`]; handlers that can mutate override them.
pub trait VfsHandler: Send + Sync {
    /// Path prefix this handler claims; empty for the physical filesystem.
    fn prefix(&self) -> &str;

    fn stat(&self, path: &str) -> Result<FileStat>;

    fn open(&self, path: &str) -> Result<VfsFile>;

    fn read_dir(&self, path: &str) -> Result<Vec<String>>;

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

/// Physical filesystem handler backed by `std::fs`
#[derive(Debug, Default)]
pub struct StdFs;

impl VfsHandler for StdFs {
    fn prefix(&self) -> &str {
        ""
    }

    fn stat(&self, path: &str) -> Result<FileStat> {
        let meta = std::fs::metadata(path).map_err(|_| ArcfsError::NotFound(path.to_string()))?;
        Ok(FileStat {
            size: meta.len(),
            kind: if meta.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            },
        })
    }

    fn open(&self, path: &str) -> Result<VfsFile> {
        let file = File::open(path).map_err(|_| ArcfsError::NotFound(path.to_string()))?;
        Ok(VfsFile::new(file))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for dirent in std::fs::read_dir(path)? {
            names.push(dirent?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

/// Prefix registry dispatching paths to mounted handlers.
///
/// Paths outside every mounted prefix fall back to the physical filesystem.
pub struct VfsRouter {
    handlers: RwLock<Vec<Arc<dyn VfsHandler>>>,
    fallback: StdFs,
}

impl VfsRouter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: RwLock::new(Vec::new()),
            fallback: StdFs,
        })
    }

    /// Mount a handler under its own prefix.
    pub fn mount(&self, handler: Arc<dyn VfsHandler>) {
        self.handlers
            .write()
            .expect("handler registry lock poisoned")
            .push(handler);
    }

    /// Handler claiming the longest prefix of `path` on a separator boundary.
    fn handler_for(&self, path: &str) -> Option<Arc<dyn VfsHandler>> {
        let handlers = self
            .handlers
            .read()
            .expect("handler registry lock poisoned");
        let mut best: Option<Arc<dyn VfsHandler>> = None;
        for handler in handlers.iter() {
            let prefix = handler.prefix();
            let boundary_ok = path.strip_prefix(prefix).map_or(false, |rest| {
                rest.is_empty() || rest.starts_with('/')
            });
            if !prefix.is_empty()
                && boundary_ok
                && best
                    .as_ref()
                    .map_or(true, |b| prefix.len() > b.prefix().len())
            {
                best = Some(handler.clone());
            }
        }
        best
    }
}

impl VfsHandler for VfsRouter {
    fn prefix(&self) -> &str {
        ""
    }

    fn stat(&self, path: &str) -> Result<FileStat> {
        match self.handler_for(path) {
            Some(handler) => handler.stat(path),
            None => self.fallback.stat(path),
        }
    }

    fn open(&self, path: &str) -> Result<VfsFile> {
        match self.handler_for(path) {
            Some(handler) => handler.open(path),
            None => self.fallback.open(path),
        }
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        match self.handler_for(path) {
            Some(handler) => handler.read_dir(path),
            None => self.fallback.read_dir(path),
        }
    }

    fn unlink(&self, path: &str) -> Result<()> {
        match self.handler_for(path) {
            Some(handler) => handler.unlink(path),
            None => self.fallback.unlink(path),
        }
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        match self.handler_for(from) {
            Some(handler) => handler.rename(from, to),
            None => self.fallback.rename(from, to),
        }
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        match self.handler_for(path) {
            Some(handler) => handler.mkdir(path),
            None => self.fallback.mkdir(path),
        }
    }

    fn rmdir(&self, path: &str) -> Result<()> {
        match self.handler_for(path) {
            Some(handler) => handler.rmdir(path),
            None => self.fallback.rmdir(path),
        }
    }
}
