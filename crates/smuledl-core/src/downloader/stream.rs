//! One streamed GET into a `.part` file.

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str;
use std::time::{Duration, Instant};

use super::progress::ProgressStats;
use crate::http::HttpClient;
use crate::retry::TransferError;

const PROGRESS_EVERY: Duration = Duration::from_millis(200);

/// Downloads `url` into `part_path` (truncating it), reporting progress on `progress_tx`.
/// Returns the number of bytes written. The length is checked against the final
/// response's `Content-Length` when present.
pub(super) fn fetch_to_file(
    client: &HttpClient,
    url: &str,
    part_path: &Path,
    attempt: u32,
    progress_tx: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<u64, TransferError> {
    let file = File::create(part_path).map_err(TransferError::Storage)?;
    let mut writer = BufWriter::with_capacity(256 * 1024, file);

    let total: Cell<Option<u64>> = Cell::new(None);
    let mut written = 0u64;
    let mut write_err: Option<std::io::Error> = None;
    let started = Instant::now();
    let mut last_report = started;

    let stats = |done: u64, total: Option<u64>| ProgressStats {
        bytes_done: done,
        total_bytes: total,
        elapsed_secs: started.elapsed().as_secs_f64(),
        attempt,
    };
    // Intermediate reports may be dropped when the receiver lags behind.
    let report = |done: u64, total: Option<u64>| {
        if let Some(tx) = progress_tx {
            let _ = tx.try_send(stats(done, total));
        }
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(Duration::from_secs(3600))?;
    client.configure(&mut easy, "*/*")?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                let line = line.trim();
                // New response in a redirect chain: forget the previous length.
                if line.starts_with("HTTP/") {
                    total.set(None);
                } else if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        total.set(value.trim().parse::<u64>().ok());
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if let Err(e) = writer.write_all(data) {
                tracing::warn!("download write failed: {}", e);
                write_err = Some(e);
                return Ok(0); // abort transfer
            }
            written += data.len() as u64;
            if last_report.elapsed() >= PROGRESS_EVERY {
                last_report = Instant::now();
                report(written, total.get());
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(TransferError::Storage(e));
    }
    perform_result?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }

    writer.flush().map_err(TransferError::Storage)?;
    writer
        .get_ref()
        .sync_all()
        .map_err(TransferError::Storage)?;

    if let Some(expected) = total.get() {
        if written != expected {
            return Err(TransferError::PartialTransfer {
                expected,
                received: written,
            });
        }
    }
    // The completion report must arrive; waits for room in the channel.
    // A closed receiver is fine.
    if let Some(tx) = progress_tx {
        let _ = tx.blocking_send(stats(written, total.get().or(Some(written))));
    }
    Ok(written)
}
