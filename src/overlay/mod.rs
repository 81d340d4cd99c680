mod cache;
mod content;
mod handler;
mod path;

pub use cache::ContentCache;
pub use content::{ArchiveContent, ArchiveEntry};
pub use handler::ArchiveOverlay;
pub use path::{normalize_entry_name, normalize_inner_path};
