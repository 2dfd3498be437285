//! Streaming downloader.
//!
//! Streams the resolved media URL into `<name>.part` in the download
//! directory, retrying transient failures from scratch, then renames the
//! finished file into place. Progress goes out on an optional tokio channel
//! so the foreground task can render it while this runs on a blocking thread.

mod naming;
mod progress;
mod stream;

pub use naming::{
    custom_file_name, media_file_name, part_path, sanitize_title, unique_destination,
};
pub use progress::ProgressStats;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::http::HttpClient;
use crate::resolver::ResolvedMedia;
use crate::retry::{run_with_retry, RetryPolicy};

/// Where a finished download ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads `url` to `final_path` via `final_path.part`.
/// The `.part` file is removed when every attempt fails.
/// Blocks; with `progress_tx` it must run off the async runtime (`spawn_blocking`),
/// since the completion report waits for room in the channel.
pub fn download(
    client: &HttpClient,
    url: &str,
    final_path: &Path,
    policy: &RetryPolicy,
    progress_tx: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<DownloadOutcome> {
    let part = part_path(final_path);
    tracing::info!(url, dest = %final_path.display(), "download started");

    let result = run_with_retry(policy, |attempt| {
        stream::fetch_to_file(client, url, &part, attempt, progress_tx)
    });

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&part) {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %part.display(), "could not remove partial file: {}", rm);
                }
            }
            return Err(anyhow::Error::new(e)).with_context(|| format!("download {}", url));
        }
    };

    std::fs::rename(&part, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            part.display(),
            final_path.display()
        )
    })?;
    tracing::info!(bytes, dest = %final_path.display(), "download finished");

    Ok(DownloadOutcome {
        path: final_path.to_path_buf(),
        bytes,
    })
}

/// Names the file after the media title (see `media_file_name`), or `file_name` when given
/// (tag-prefixed the same way),
/// picks a free path in `dir` (created if missing) and downloads there.
pub fn download_media(
    client: &HttpClient,
    media: &ResolvedMedia,
    dir: &Path,
    library_tag: &str,
    file_name: Option<&str>,
    progress_tx: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<DownloadOutcome> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create download dir {}", dir.display()))?;

    let name = match file_name {
        Some(name) => custom_file_name(name, media.kind, library_tag),
        None => media_file_name(&media.title, media.kind, library_tag),
    };

    let final_path = unique_destination(dir, &name);
    download(
        client,
        &media.url,
        &final_path,
        client.retry_policy(),
        progress_tx,
    )
}
