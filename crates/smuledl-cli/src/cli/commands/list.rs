//! `smuledl list` – show downloaded recordings in the download directory.

use anyhow::Result;
use smuledl_core::config::SmuledlConfig;
use smuledl_core::library;
use std::path::Path;

pub fn run_list(cfg: &SmuledlConfig, dir: &Path) -> Result<()> {
    let files = library::scan(dir, &cfg.library_tag)?;
    if files.is_empty() {
        println!("No downloads in {}.", dir.display());
        return Ok(());
    }
    println!(
        "{:<9} {:<10} {:<5} {:<16} {}",
        "ID", "SIZE", "TYPE", "DATE", "NAME"
    );
    for f in &files {
        println!(
            "{:<9} {:<10} {:<5} {:<16} {}",
            f.id,
            f.size_label(),
            f.extension_label(),
            f.modified_label(),
            f.name
        );
    }
    Ok(())
}
