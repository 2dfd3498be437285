//! `smuledl delete <id>...` – delete downloaded recordings after confirmation.

use anyhow::{bail, Context, Result};
use smuledl_core::config::SmuledlConfig;
use smuledl_core::library::{self, DownloadedFile};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Reads one answer line; only `y` / `yes` (any case) confirm.
fn confirmed<R: BufRead>(reader: &mut R) -> Result<bool> {
    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .context("read confirmation")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn prompt(files: &[&DownloadedFile]) -> String {
    match files {
        [one] => format!("Delete {}? [y/N] ", one.name),
        many => format!("Delete {} files? [y/N] ", many.len()),
    }
}

pub fn run_delete(cfg: &SmuledlConfig, dir: &Path, ids: &[String], yes: bool) -> Result<()> {
    let files = library::scan(dir, &cfg.library_tag)?;
    let picked = library::find_by_ids(&files, ids);

    for id in ids {
        if library::find_by_ids(&files, std::slice::from_ref(id)).is_empty() {
            eprintln!("No downloaded file with ID {}", id);
        }
    }
    if picked.is_empty() {
        bail!("nothing to delete in {}", dir.display());
    }

    if !yes {
        for f in &picked {
            println!("  {}  {}", f.id, f.name);
        }
        print!("{}", prompt(&picked));
        io::stdout().flush()?;
        if !confirmed(&mut io::stdin().lock())? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let report = library::delete_many(picked.iter().copied());
    for (name, err) in &report.failed {
        eprintln!("Could not delete {}: {}", name, err);
    }
    if report.all_deleted() {
        println!("Deleted {} file(s).", report.deleted.len());
        Ok(())
    } else {
        bail!(
            "deleted {} file(s), {} could not be deleted",
            report.deleted.len(),
            report.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(confirmed(&mut "y\n".as_bytes()).unwrap());
        assert!(confirmed(&mut " YES \n".as_bytes()).unwrap());
        assert!(!confirmed(&mut "n\n".as_bytes()).unwrap());
        assert!(!confirmed(&mut "\n".as_bytes()).unwrap());
        assert!(!confirmed(&mut "".as_bytes()).unwrap());
    }

    #[test]
    fn delete_removes_selected_files_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Smule_a.m4a"), b"a").unwrap();
        std::fs::write(dir.path().join("Smule_b.mp4"), b"b").unwrap();
        let cfg = SmuledlConfig::default();

        let id = library::file_id("Smule_a.m4a");
        run_delete(&cfg, dir.path(), &[id], true).unwrap();

        assert!(!dir.path().join("Smule_a.m4a").exists());
        assert!(dir.path().join("Smule_b.mp4").exists());
    }

    #[test]
    fn delete_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SmuledlConfig::default();
        assert!(run_delete(&cfg, dir.path(), &["deadbeef".to_string()], true).is_err());
    }
}
