//! Progress reporting for downloads (bytes done, ETA, rate).
//!
//! Sent from the download thread to the foreground over a tokio mpsc channel.

/// Snapshot of download progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Bytes written so far in the current attempt.
    pub bytes_done: u64,
    /// Total size from `Content-Length`, when the server sent one.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the attempt started (seconds).
    pub elapsed_secs: f64,
    /// 1-based attempt number.
    pub attempt: u32,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if size unknown or rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0], if the size is known.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total_bytes?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.bytes_done as f64 / total as f64).min(1.0))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total_bytes, Some(t) if self.bytes_done >= t)
    }
}
