//! Print one archive entry to stdout.
//!
//! ```text
//! cargo run --example cat -- /arczip//path/to/archive.zip/inner/file.txt
//! ```

use anyhow::{bail, Context, Result};
use arcfs::{ArchiveOverlay, TarFormat, VfsHandler, VfsRouter, ZipFormat};
use std::io::{Read, Write};
use std::sync::Arc;

fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: cat <virtual-path>  (e.g. /arczip//data/demo.zip/readme.txt)");
    };

    let router = VfsRouter::new();
    router.mount(Arc::new(ArchiveOverlay::with_host(
        ZipFormat,
        router.clone(),
    )));
    router.mount(Arc::new(ArchiveOverlay::with_host(
        TarFormat,
        router.clone(),
    )));

    let mut stream = router
        .open(&path)
        .with_context(|| format!("cannot open {path}"))?;

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    std::io::stdout().write_all(&bytes)?;

    Ok(())
}
