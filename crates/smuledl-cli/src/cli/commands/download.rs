//! `smuledl download <link>` – resolve, then stream the recording into the download directory.

use anyhow::Result;
use smuledl_core::config::SmuledlConfig;
use smuledl_core::downloader::{self, ProgressStats};
use smuledl_core::library::format_size;
use smuledl_core::resolver::{PerformanceResolver, Resolver};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::cli::input;

const PROGRESS_INTERVAL_MS: u128 = 500;

fn progress_line(stats: &ProgressStats) -> String {
    let rate = format_size(stats.bytes_per_sec() as u64);
    match (stats.total_bytes, stats.fraction()) {
        (Some(total), Some(fraction)) => {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "  {} / {} ({:.1}%)  {}/s  ETA {}",
                format_size(stats.bytes_done),
                format_size(total),
                fraction * 100.0,
                rate,
                eta
            )
        }
        _ => format!("  {}  {}/s", format_size(stats.bytes_done), rate),
    }
}

pub async fn run_download(
    cfg: &SmuledlConfig,
    link: &str,
    dir: &Path,
    name: Option<&str>,
) -> Result<()> {
    let link = input::read_link(link)?;
    let resolver = PerformanceResolver::from_config(cfg)?;
    let client = resolver.client().clone();
    let media = tokio::task::spawn_blocking(move || resolver.resolve(&link)).await??;
    println!("Downloading \"{}\" ({})", media.title, media.kind);

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
    let progress_handle = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut printed = false;
        while let Some(stats) = progress_rx.recv().await {
            let due = last_print
                .map(|t| t.elapsed().as_millis() >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || stats.is_complete() {
                eprint!("\r{}   ", progress_line(&stats));
                let _ = std::io::stderr().flush();
                last_print = Some(Instant::now());
                printed = true;
            }
        }
        if printed {
            eprintln!();
        }
    });

    let dir = dir.to_path_buf();
    let tag = cfg.library_tag.clone();
    let name = name.map(str::to_string);
    let result = tokio::task::spawn_blocking(move || {
        downloader::download_media(
            &client,
            &media,
            &dir,
            &tag,
            name.as_deref(),
            Some(&progress_tx),
        )
    })
    .await;
    let _ = progress_handle.await;
    let outcome = result??;

    tracing::info!(path = %outcome.path.display(), bytes = outcome.bytes, "saved");
    println!(
        "Saved {} ({})",
        outcome.path.display(),
        format_size(outcome.bytes)
    );
    Ok(())
}
