//! Deleting library files, one or many.

use anyhow::{Context, Result};

use super::DownloadedFile;

pub fn delete(file: &DownloadedFile) -> Result<()> {
    std::fs::remove_file(&file.path)
        .with_context(|| format!("delete {}", file.path.display()))?;
    tracing::info!(name = %file.name, "deleted");
    Ok(())
}

/// Result of a bulk delete.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    /// `(name, error)` for files that could not be deleted.
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    pub fn all_deleted(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes every file; a failure is recorded and the rest are still attempted.
pub fn delete_many<'a, I>(files: I) -> DeleteReport
where
    I: IntoIterator<Item = &'a DownloadedFile>,
{
    let mut report = DeleteReport::default();
    for file in files {
        match delete(file) {
            Ok(()) => report.deleted.push(file.name.clone()),
            Err(e) => {
                tracing::warn!(name = %file.name, "delete failed: {:#}", e);
                report.failed.push((file.name.clone(), format!("{:#}", e)));
            }
        }
    }
    report
}
