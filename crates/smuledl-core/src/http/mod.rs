//! HTTP access to the performance site.
//!
//! Uses the curl crate (libcurl) with browser-like headers. Three request
//! shapes cover the pipeline: a page GET that follows redirects, a GET that
//! stops at the first redirect (redirect endpoint), and a HEAD that follows
//! redirects to learn the effective media URL.
//! All calls block; run them from `spawn_blocking` when used from async code.

mod parse;

pub use parse::{parse_head, ResponseHead};

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::config::SmuledlConfig;
use crate::error::ResolveError;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// A fetched HTML (or JSON) page.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u32,
    /// URL after redirects.
    pub final_url: String,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

/// Shared request settings. Cheap to clone; each request builds its own curl handle.
#[derive(Debug, Clone)]
pub struct HttpClient {
    user_agent: String,
    accept_language: String,
    referer: Option<String>,
    connect_timeout: Duration,
    request_timeout: Duration,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(user_agent: &str, accept_language: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            accept_language: accept_language.to_string(),
            referer: None,
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::once(),
        }
    }

    pub fn from_config(cfg: &SmuledlConfig) -> Self {
        let referer = format!("{}/", cfg.site_origin.trim_end_matches('/'));
        Self::new(&cfg.user_agent, &cfg.accept_language)
            .with_referer(&referer)
            .with_timeouts(
                Duration::from_secs(cfg.connect_timeout_secs),
                Duration::from_secs(cfg.request_timeout_secs),
            )
            .with_retry(cfg.retry_policy())
    }

    pub fn with_referer(mut self, referer: &str) -> Self {
        self.referer = Some(referer.to_string());
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Applies agent, headers and connect timeout to a fresh handle.
    /// The total timeout is left to the caller (downloads use a low-speed limit instead).
    pub(crate) fn configure(
        &self,
        easy: &mut curl::easy::Easy,
        accept: &str,
    ) -> Result<(), curl::Error> {
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Accept: {}", accept))?;
        list.append(&format!("Accept-Language: {}", self.accept_language))?;
        if let Some(referer) = &self.referer {
            list.append(&format!("Referer: {}", referer))?;
        }
        easy.http_headers(list)?;
        Ok(())
    }

    /// GET a page, following redirects. Non-2xx is an error; transient failures are retried.
    pub fn get_page(&self, url: &str) -> Result<Page> {
        let page = run_with_retry(&self.retry, |attempt| {
            tracing::debug!(url, attempt, "GET page");
            self.get_page_once(url)
        })
        .map_err(|e| match e {
            TransferError::Http(status) => anyhow::Error::new(ResolveError::UnexpectedStatus {
                url: url.to_string(),
                status,
            }),
            other => anyhow::Error::new(other).context(format!("GET {}", url)),
        })?;
        tracing::debug!(url, final_url = %page.final_url, bytes = page.body.len(), "page fetched");
        Ok(page)
    }

    fn get_page_once(&self, url: &str) -> Result<Page, TransferError> {
        let mut body: Vec<u8> = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.timeout(self.request_timeout)?;
        self.configure(&mut easy, ACCEPT_HTML)?;
        // Empty string = every encoding libcurl supports; pages compress well.
        easy.accept_encoding("")?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(TransferError::Http(status));
        }
        let final_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());

        Ok(Page {
            status,
            final_url,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// GET without following redirects; the caller inspects status and `Location`.
    pub fn get_no_follow(&self, url: &str) -> Result<ResponseHead> {
        self.head_request(url, false, false)
            .with_context(|| format!("GET {} (no redirects)", url))
    }

    /// HEAD following redirects; `final_url` is where the redirect chain ended.
    pub fn head_follow(&self, url: &str) -> Result<ResponseHead> {
        self.head_request(url, true, true)
            .with_context(|| format!("HEAD {}", url))
    }

    fn head_request(&self, url: &str, nobody: bool, follow: bool) -> Result<ResponseHead> {
        let mut lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.nobody(nobody)?;
        easy.follow_location(follow)?;
        if follow {
            easy.max_redirections(10)?;
        }
        easy.timeout(self.request_timeout)?;
        self.configure(&mut easy, "*/*")?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            // The body of a redirect response is not needed.
            transfer.write_function(|data| Ok(data.len()))?;
            transfer.perform().context("request failed")?;
        }

        let effective = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        let mut head = parse_head(&lines, &effective);
        if let Ok(code) = easy.response_code() {
            if code != 0 {
                head.status = code;
            }
        }
        // libcurl resolves relative Location values for us.
        if !follow {
            if let Ok(Some(target)) = easy.redirect_url() {
                head.location = Some(target.to_string());
            }
        }
        Ok(head)
    }
}
