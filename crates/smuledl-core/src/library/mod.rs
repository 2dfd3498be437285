//! Local catalogue of downloaded media.
//!
//! There is no index of our own: the download directory is scanned on demand
//! and files carrying the library tag in their name are ours.

mod delete;
mod size;

pub use delete::{delete, delete_many, DeleteReport};
pub use size::format_size;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::checksum::sha256_hex;
use crate::resolver::MediaKind;

/// Hex characters of the name digest used as the display id.
const ID_LEN: usize = 8;

/// A downloaded file found in the download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Short id derived from the file name; stable while the file keeps its name.
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

impl DownloadedFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("{} has no file name", path.display()))?;
        Ok(Self {
            id: file_id(&name),
            name,
            path: path.to_path_buf(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
        })
    }

    /// `.mp4` files are video; everything else is played as audio.
    pub fn kind(&self) -> MediaKind {
        if self.name.to_ascii_lowercase().ends_with(".mp4") {
            MediaKind::Video
        } else {
            MediaKind::Audio
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind().mime_family()
    }

    /// Upper-cased extension (`MP4`, `M4A`), empty without one.
    pub fn extension_label(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_uppercase(),
            _ => String::new(),
        }
    }

    pub fn size_label(&self) -> String {
        format_size(self.size)
    }

    /// Local modification time, `YYYY-MM-DD HH:MM`.
    pub fn modified_label(&self) -> String {
        let dt: DateTime<Local> = self.modified.into();
        dt.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub fn file_id(name: &str) -> String {
    let mut id = sha256_hex(name.as_bytes());
    id.truncate(ID_LEN);
    id
}

/// Regular files in `dir` whose name contains `tag` (case-insensitive), newest first.
/// In-progress `.part` files are skipped. A missing directory is an empty library.
pub fn scan(dir: &Path, tag: &str) -> Result<Vec<DownloadedFile>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("read dir {}", dir.display())),
    };

    let tag = tag.to_lowercase();
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let lower = name.to_lowercase();
        if !lower.contains(&tag) || lower.ends_with(".part") {
            continue;
        }
        match entry.file_type() {
            Ok(ft) if ft.is_file() => {}
            _ => continue,
        }
        match DownloadedFile::from_path(&entry.path()) {
            Ok(file) => files.push(file),
            Err(e) => tracing::warn!("skipping {}: {:#}", name, e),
        }
    }

    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    tracing::debug!(dir = %dir.display(), count = files.len(), "library scanned");
    Ok(files)
}

/// Files whose id or exact name matches one of `ids`, in library order.
pub fn find_by_ids<'a>(files: &'a [DownloadedFile], ids: &[String]) -> Vec<&'a DownloadedFile> {
    files
        .iter()
        .filter(|f| {
            ids.iter()
                .any(|id| f.id.eq_ignore_ascii_case(id.trim()) || f.name == *id)
        })
        .collect()
}
