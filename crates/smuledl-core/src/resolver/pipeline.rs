//! Page link → media URL.
//!
//! Order of attempts:
//! 1. share-card page (`<page>/twitter`): `og:title` and the
//!    `twitter:player:stream` redirect;
//! 2. the page itself: the same meta tags;
//! 3. the page's embedded JSON media fields, each submitted to the redirect
//!    endpoint, best quality first.

use anyhow::Result;

use super::priority::{select_first, Selection};
use super::{MediaKind, ResolvedMedia, Resolver};
use crate::config::SmuledlConfig;
use crate::error::ResolveError;
use crate::extract::{extract_candidates, extract_meta, extract_performance_type, PageMeta};
use crate::http::HttpClient;
use crate::link::{PerformanceLink, Site};
use crate::redirect;

/// Resolver for performance pages on the configured site.
#[derive(Debug, Clone)]
pub struct PerformanceResolver {
    client: HttpClient,
    site: Site,
}

impl PerformanceResolver {
    pub fn new(client: HttpClient, site: Site) -> Self {
        Self { client, site }
    }

    pub fn from_config(cfg: &SmuledlConfig) -> Result<Self> {
        Ok(Self::new(
            HttpClient::from_config(cfg),
            Site::new(&cfg.site_origin)?,
        ))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Follows the meta stream URL; kind from the final response, the meta tag, then the URL.
    fn resolve_stream(&self, meta: &PageMeta, stream_url: &str) -> Result<(String, MediaKind)> {
        let head = redirect::follow_stream(&self.client, stream_url)?;
        let kind = head
            .content_type
            .as_deref()
            .and_then(MediaKind::from_content_type)
            .or_else(|| {
                meta.stream_content_type
                    .as_deref()
                    .and_then(MediaKind::from_content_type)
            })
            .unwrap_or_else(|| MediaKind::from_url(&head.final_url));
        Ok((head.final_url, kind))
    }

    /// Tries the page's stream meta tag; records the failure and returns None if it does not resolve.
    fn try_meta_stream(
        &self,
        meta: &PageMeta,
        title: &Option<String>,
        last_error: &mut Option<String>,
    ) -> Option<ResolvedMedia> {
        let stream_url = meta.stream_url.as_deref()?;
        match self.resolve_stream(meta, stream_url) {
            Ok((url, kind)) => Some(ResolvedMedia::new(title.clone(), url, kind)),
            Err(e) => {
                tracing::warn!(stream_url, "stream meta did not resolve: {:#}", e);
                *last_error = Some(format!("{:#}", e));
                None
            }
        }
    }

    pub fn resolve_link(&self, link: &PerformanceLink) -> Result<ResolvedMedia> {
        let mut title: Option<String> = None;
        let mut last_error: Option<String> = None;

        match self.client.get_page(&link.twitter_url) {
            Ok(card) => {
                let meta = extract_meta(&card.body);
                title = meta.title.clone();
                if let Some(media) = self.try_meta_stream(&meta, &title, &mut last_error) {
                    tracing::info!(url = %media.url, "resolved via share card");
                    return Ok(media);
                }
            }
            Err(e) => {
                tracing::debug!(url = %link.twitter_url, "share card unavailable: {:#}", e);
                last_error = Some(format!("{:#}", e));
            }
        }

        let page = match self.client.get_page(&link.page_url) {
            Ok(page) => page,
            Err(e) => {
                return Err(ResolveError::NoMedia {
                    page: link.page_url.clone(),
                    last_error: Some(format!("{:#}", e)),
                }
                .into());
            }
        };

        let meta = extract_meta(&page.body);
        if title.is_none() {
            title = meta.title.clone();
        }
        if let Some(media) = self.try_meta_stream(&meta, &title, &mut last_error) {
            tracing::info!(url = %media.url, "resolved via page meta");
            return Ok(media);
        }

        if let Some(kind) = extract_performance_type(&page.body) {
            tracing::debug!(performance_type = %kind, "page state found");
        }
        let candidates = extract_candidates(&page.body);
        tracing::debug!(count = candidates.len(), "embedded media fields");

        match select_first(&candidates, |c| {
            redirect::resolve_redirect(&self.client, &self.site, &c.value)
        })? {
            Selection::Found { candidate, url } => {
                let kind = candidate
                    .field
                    .kind_hint()
                    .unwrap_or_else(|| MediaKind::from_url(&url));
                tracing::info!(field = candidate.field.key(), url = %url, "resolved via redirect endpoint");
                Ok(ResolvedMedia::new(title, url, kind))
            }
            Selection::Exhausted { failures } => Err(ResolveError::NoMedia {
                page: link.page_url.clone(),
                last_error: failures.into_iter().last().or(last_error),
            }
            .into()),
        }
    }
}

impl Resolver for PerformanceResolver {
    fn resolve(&self, link: &str) -> Result<ResolvedMedia> {
        let link = self.site.normalize_link(link)?;
        tracing::info!(
            page = %link.page_url,
            performance = link.key().unwrap_or("-"),
            "resolving"
        );
        self.resolve_link(&link)
    }
}
