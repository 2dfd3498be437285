//! The configured site origin and link normalisation against it.

use url::Url;

use super::PerformanceLink;
use crate::error::ResolveError;

/// Site origin (`https://www.smule.com` by default). Links on other hosts are
/// re-rooted here; the redirect endpoint lives here too.
#[derive(Debug, Clone)]
pub struct Site {
    origin: Url,
    domain: String,
}

impl Site {
    pub fn new(origin: &str) -> anyhow::Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| anyhow::anyhow!("invalid site origin {:?}: {}", origin, e))?;
        let host = origin
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("site origin {} has no host", origin))?;
        let domain = host
            .strip_prefix("www.")
            .unwrap_or(host)
            .to_ascii_lowercase();
        Ok(Self { origin, domain })
    }

    /// Origin host without a leading `www.`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Absolute URL for a path on the site (e.g. `/redir`).
    pub fn endpoint(&self, path: &str) -> Url {
        let mut u = self.origin.clone();
        u.set_path(path);
        u.set_query(None);
        u.set_fragment(None);
        u
    }

    /// Turns pasted text (`smule.com/c/..`, `https://www.smule.com/c/..?foo`, ...)
    /// into a page link. Hosts outside the site domain are replaced by the origin host.
    pub fn normalize_link(&self, input: &str) -> Result<PerformanceLink, ResolveError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::InvalidLink("empty link".to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let parsed = Url::parse(&with_scheme)
            .map_err(|e| ResolveError::InvalidLink(format!("{}: {}", trimmed, e)))?;
        let path = parsed.path();
        if path.trim_matches('/').is_empty() {
            return Err(ResolveError::InvalidLink(format!(
                "{}: no performance path",
                trimmed
            )));
        }

        let mut page = self.origin.clone();
        let on_site = parsed
            .host_str()
            .map(|h| h.to_ascii_lowercase().contains(&self.domain))
            .unwrap_or(false);
        if on_site {
            if let Some(host) = parsed.host_str() {
                page.set_host(Some(host))
                    .map_err(|e| ResolveError::InvalidLink(format!("{}: {}", trimmed, e)))?;
                page.set_port(parsed.port().or(self.origin.port()))
                    .map_err(|_| ResolveError::InvalidLink(format!("{}: bad port", trimmed)))?;
            }
        }
        page.set_path(path);
        page.set_query(None);
        page.set_fragment(None);

        Ok(PerformanceLink::from_page_url(page.to_string()))
    }
}
