//! Resolver interface for turning a pasted page link into a direct media URL.
//!
//! The downloader only depends on `ResolvedMedia`; how it was obtained
//! (share card, embedded JSON, something else) stays behind `Resolver`.

mod pipeline;
mod priority;

pub use pipeline::PerformanceResolver;
pub use priority::{select_first, Selection};

use std::fmt;

/// Title used when the page has no `og:title`.
pub const DEFAULT_TITLE: &str = "Smule_Recording";

/// Whether a media item is video or audio-only. Picks extension and MIME family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// URLs pointing at `.mp4` files are video; everything else is treated as audio.
    pub fn from_url(url: &str) -> Self {
        if url.contains(".mp4") {
            MediaKind::Video
        } else {
            MediaKind::Audio
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.trim().to_ascii_lowercase();
        if ct.starts_with("video/") {
            Some(MediaKind::Video)
        } else if ct.starts_with("audio/") {
            Some(MediaKind::Audio)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Video => "mp4",
            MediaKind::Audio => "m4a",
        }
    }

    pub fn mime_family(self) -> &'static str {
        match self {
            MediaKind::Video => "video/*",
            MediaKind::Audio => "audio/*",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Audio => f.write_str("audio"),
        }
    }
}

/// A remote media item ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub title: String,
    pub url: String,
    pub kind: MediaKind,
}

impl ResolvedMedia {
    /// Blank titles fall back to `DEFAULT_TITLE`.
    pub fn new(title: Option<String>, url: String, kind: MediaKind) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        Self { title, url, kind }
    }
}

/// Implemented by anything that can turn user input into a `ResolvedMedia`.
pub trait Resolver {
    fn resolve(&self, link: &str) -> anyhow::Result<ResolvedMedia>;
}
