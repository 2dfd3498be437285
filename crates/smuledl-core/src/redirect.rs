//! Redirect resolution.
//!
//! The page state carries obfuscated media references. Submitting one to the
//! site's `/redir` endpoint yields a 302 whose `Location` is the CDN file.
//! Share-card stream URLs are plain redirects and are simply followed.

use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ResolveError;
use crate::http::{HttpClient, ResponseHead};
use crate::link::Site;

pub const REDIR_PATH: &str = "/redir";

/// Builds `<origin>/redir?e=1&t=<unix secs>.12345&url=<value>` with `value` percent-encoded.
pub fn redir_url(site: &Site, encrypted: &str, now: SystemTime) -> String {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut u = site.endpoint(REDIR_PATH);
    u.query_pairs_mut()
        .append_pair("e", "1")
        .append_pair("t", &format!("{}.12345", secs))
        .append_pair("url", encrypted);
    u.to_string()
}

/// Maps the response of a non-following GET on the redirect endpoint to the media URL.
pub fn location_from_response(redir: &str, head: &ResponseHead) -> Result<String, ResolveError> {
    if head.is_redirect() {
        if let Some(location) = head.location.as_deref().filter(|l| !l.is_empty()) {
            return Ok(location.to_string());
        }
    }
    match head.status {
        418 => Err(ResolveError::Blocked {
            url: redir.to_string(),
        }),
        status => Err(ResolveError::UnexpectedStatus {
            url: redir.to_string(),
            status,
        }),
    }
}

/// Submits an extracted value to the redirect endpoint and returns the redirect target.
pub fn resolve_redirect(client: &HttpClient, site: &Site, encrypted: &str) -> Result<String> {
    let redir = redir_url(site, encrypted, SystemTime::now());
    let head = client.get_no_follow(&redir)?;
    tracing::debug!(status = head.status, "redirect endpoint answered");
    Ok(location_from_response(&redir, &head)?)
}

/// Whether a followed stream chain ended somewhere downloadable: 2xx, or 403/405
/// after at least one redirect (some CDNs refuse HEAD on the final hop even though
/// GET works). Any other status means the stream is dead.
pub fn stream_accepted(stream_url: &str, head: &ResponseHead) -> bool {
    if head.is_success() {
        return true;
    }
    matches!(head.status, 403 | 405) && head.final_url != stream_url
}

/// Follows a stream URL (HEAD, redirects on) and returns the final response head.
pub fn follow_stream(client: &HttpClient, stream_url: &str) -> Result<ResponseHead> {
    let head = client.head_follow(stream_url)?;
    if stream_accepted(stream_url, &head) {
        return Ok(head);
    }
    Err(ResolveError::UnexpectedStatus {
        url: stream_url.to_string(),
        status: head.status,
    }
    .into())
}
