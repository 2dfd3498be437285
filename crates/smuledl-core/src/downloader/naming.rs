//! File names for downloaded media.

use std::path::{Path, PathBuf};

use crate::resolver::{MediaKind, DEFAULT_TITLE};

/// Leaves room for the tag prefix, a ` (n)` suffix and the extension under NAME_MAX.
const MAX_STEM_BYTES: usize = 200;

/// Keeps ASCII letters, digits, `-`, `_` and space; everything else becomes `_`.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut stem = replaced.trim().to_string();
    if stem.len() > MAX_STEM_BYTES {
        // Only ASCII remains, so any byte index is a char boundary.
        stem.truncate(MAX_STEM_BYTES);
        stem = stem.trim_end().to_string();
    }
    if stem.is_empty() || stem.chars().all(|c| c == '_') {
        return DEFAULT_TITLE.to_string();
    }
    stem
}

/// `<title>.mp4` / `<title>.m4a`, prefixed with `<tag>_` unless the title already
/// contains the library tag (files without it would not be listed).
pub fn media_file_name(title: &str, kind: MediaKind, tag: &str) -> String {
    format!("{}.{}", with_tag(sanitize_title(title), tag), kind.extension())
}

/// Prefixes a sanitized stem with `<tag>_` unless it already contains the tag.
fn with_tag(stem: String, tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        return stem;
    }
    let tag = sanitize_title(tag);
    if stem.to_ascii_lowercase().contains(&tag.to_ascii_lowercase()) {
        stem
    } else {
        format!("{}_{}", tag, stem)
    }
}

/// A user-chosen name: sanitized stem, keeping its own extension when it has one.
/// The tag rule of `media_file_name` applies so the file stays in the library.
pub fn custom_file_name(name: &str, kind: MediaKind, tag: &str) -> String {
    let name = name.trim();
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (stem, ext)
        }
        _ => (name, kind.extension()),
    };
    format!("{}.{}", with_tag(sanitize_title(stem), tag), ext)
}

/// Temp path used while downloading: `name.part` next to the destination.
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// `dir/name`, or `dir/stem (1).ext`, `dir/stem (2).ext`, ... if taken
/// (by a finished file or an in-progress `.part`).
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let taken = |p: &Path| p.exists() || part_path(p).exists();

    let first = dir.join(name);
    if !taken(&first) {
        return first;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 1u32;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        let path = dir.join(candidate);
        if !taken(&path) {
            return path;
        }
        n += 1;
    }
}
