//! `og:` / `twitter:` meta tags.

use scraper::{Html, Selector};

/// What the share-card meta tags say about a performance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// `og:title`.
    pub title: Option<String>,
    /// `twitter:player:stream`: a URL that redirects to the media file.
    pub stream_url: Option<String>,
    /// `twitter:player:stream:content_type`, when given.
    pub stream_content_type: Option<String>,
}

/// Parses `html` and collects the meta tags. Blank values count as absent.
pub fn extract_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);
    PageMeta {
        title: meta_content(&document, "og:title"),
        stream_url: meta_content(&document, "twitter:player:stream"),
        stream_content_type: meta_content(&document, "twitter:player:stream:content_type"),
    }
}

/// Content of the first `<meta>` whose `property` or `name` is `key`.
fn meta_content(document: &Html, key: &str) -> Option<String> {
    let css = format!(r#"meta[property="{key}"], meta[name="{key}"]"#);
    let selector = Selector::parse(&css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
