//! `smuledl path <id>` – hand a downloaded file to an external player or share tool.

use anyhow::{bail, Result};
use smuledl_core::config::SmuledlConfig;
use smuledl_core::library;
use std::path::Path;

pub fn run_path(cfg: &SmuledlConfig, dir: &Path, id: &str) -> Result<()> {
    let files = library::scan(dir, &cfg.library_tag)?;
    let found = library::find_by_ids(&files, &[id.to_string()]);
    let Some(file) = found.first() else {
        bail!("no downloaded file with ID {} in {}", id, dir.display());
    };
    let path = file.path.canonicalize().unwrap_or_else(|_| file.path.clone());
    tracing::debug!(path = %path.display(), mime = file.mime_type(), "path requested");
    println!("{}", path.display());
    Ok(())
}
