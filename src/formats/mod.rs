mod tar;
mod zip;

pub use self::tar::{TarFormat, TarReader};
pub use self::zip::{ZipFormat, ZipReader};
