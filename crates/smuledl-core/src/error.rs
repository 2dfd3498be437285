//! Typed outcomes of the resolution pipeline.
//!
//! Everything else in the crate uses `anyhow`; these variants exist because
//! callers (CLI, tests) branch on them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The pasted text cannot be turned into a performance page URL.
    #[error("invalid link: {0}")]
    InvalidLink(String),

    /// The redirect endpoint answered 418, which the site uses for bot blocking.
    #[error("blocked by {url} (HTTP 418)")]
    Blocked { url: String },

    /// A request returned a status the pipeline does not handle.
    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u32 },

    /// Neither the share-card stream nor any embedded media field resolved.
    #[error("no downloadable media found on {page}{}", last_error_suffix(.last_error))]
    NoMedia {
        page: String,
        last_error: Option<String>,
    },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {e})"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_media_display_includes_last_error() {
        let e = ResolveError::NoMedia {
            page: "https://www.smule.com/c/1_2".to_string(),
            last_error: Some("HTTP 404".to_string()),
        };
        let s = e.to_string();
        assert!(s.contains("https://www.smule.com/c/1_2"));
        assert!(s.contains("last error: HTTP 404"));
    }

    #[test]
    fn no_media_display_without_last_error() {
        let e = ResolveError::NoMedia {
            page: "p".to_string(),
            last_error: None,
        };
        assert_eq!(e.to_string(), "no downloadable media found on p");
    }

    #[test]
    fn blocked_display() {
        let e = ResolveError::Blocked {
            url: "https://www.smule.com/redir".to_string(),
        };
        assert!(e.to_string().contains("418"));
    }
}
