//! Embedded JSON media fields (`"video_media_mp4_url":"..."` and friends).

use regex::Regex;
use std::sync::OnceLock;

use crate::resolver::MediaKind;

/// Media URL keys found in the page state, ordered by assumed quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaField {
    VideoMp4,
    Video,
    Visualizer,
    Media,
    Audio,
}

impl MediaField {
    /// Resolution order: best first.
    pub const PRIORITY: [MediaField; 5] = [
        MediaField::VideoMp4,
        MediaField::Video,
        MediaField::Visualizer,
        MediaField::Media,
        MediaField::Audio,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MediaField::VideoMp4 => "video_media_mp4_url",
            MediaField::Video => "video_media_url",
            MediaField::Visualizer => "visualizer_media_url",
            MediaField::Media => "media_url",
            MediaField::Audio => "audio_media_url",
        }
    }

    /// `media_url` can be either; the resolved URL decides.
    pub fn kind_hint(self) -> Option<MediaKind> {
        match self {
            MediaField::VideoMp4 | MediaField::Video | MediaField::Visualizer => {
                Some(MediaKind::Video)
            }
            MediaField::Audio => Some(MediaKind::Audio),
            MediaField::Media => None,
        }
    }
}

/// An extracted, still-obfuscated media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: MediaField,
    pub value: String,
}

fn field_regex(key: &str) -> Option<Regex> {
    // A JSON string value: anything but quote/backslash, or an escape pair.
    Regex::new(&format!(
        r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#,
        regex::escape(key)
    ))
    .ok()
}

fn media_field_regexes() -> &'static [(MediaField, Option<Regex>)] {
    static RES: OnceLock<Vec<(MediaField, Option<Regex>)>> = OnceLock::new();
    RES.get_or_init(|| {
        MediaField::PRIORITY
            .iter()
            .map(|f| (*f, field_regex(f.key())))
            .collect()
    })
}

/// Decodes JSON string escapes (`\/`, `&`, ...). Falls back to the raw text
/// with only `\/` undone if it is not valid JSON.
fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw))
        .unwrap_or_else(|_| raw.replace("\\/", "/"))
}

fn first_value(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| decode_json_string(m.as_str()))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// First non-empty string value for `key` anywhere in `text`.
pub fn extract_field(text: &str, key: &str) -> Option<String> {
    let re = field_regex(key)?;
    first_value(&re, text)
}

/// The performance `"type"` (e.g. `"video"`, `"audio"`), for diagnostics.
pub fn extract_performance_type(text: &str) -> Option<String> {
    extract_field(text, "type")
}

/// All media fields present in `text`, best first.
pub fn extract_candidates(text: &str) -> Vec<Candidate> {
    media_field_regexes()
        .iter()
        .filter_map(|(field, re)| {
            let value = first_value(re.as_ref()?, text)?;
            Some(Candidate {
                field: *field,
                value,
            })
        })
        .collect()
}
