//! List the contents of a virtual archive directory.
//!
//! ```text
//! cargo run --example ls -- /arczip//path/to/archive.zip
//! cargo run --example ls -- /arczip//path/to/archive.zip/subdir
//! ```

use anyhow::{bail, Context, Result};
use arcfs::{ArchiveOverlay, TarFormat, VfsHandler, VfsRouter, ZipFormat};
use std::sync::Arc;

fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: ls <virtual-path>  (e.g. /arczip//data/demo.zip)");
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

    let names = router
        .read_dir(&path)
        .with_context(|| format!("cannot list {path}"))?;

    for name in names {
        let child = format!("{path}/{name}");
        match router.stat(&child) {
            Ok(stat) if stat.is_directory() => println!("{name}/"),
            Ok(stat) => println!("{name}\t{} bytes", stat.size),
            Err(_) => println!("{name}"),
        }
    }

    Ok(())
}
