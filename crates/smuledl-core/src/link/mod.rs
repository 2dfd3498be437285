//! Performance page links: normalise whatever the user pasted into the page
//! URL and its share-card (`/twitter`) variant.

mod site;

pub use site::Site;

/// A normalised performance page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceLink {
    /// `scheme://host/path` with query and fragment removed.
    pub page_url: String,
    /// Share-card page carrying `og:title` and `twitter:player:stream`.
    pub twitter_url: String,
}

impl PerformanceLink {
    pub(crate) fn from_page_url(page_url: String) -> Self {
        let twitter_url = format!("{}/twitter", page_url.trim_end_matches('/'));
        Self {
            page_url,
            twitter_url,
        }
    }

    /// Last path segment, e.g. `3187786396_5144609973` for `/sing-recording/3187786396_5144609973`.
    pub fn key(&self) -> Option<&str> {
        let path = self.page_url.split_once("://")?.1;
        let (_, path) = path.split_once('/')?;
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_url_trims_trailing_slash() {
        let l = PerformanceLink::from_page_url("https://www.smule.com/c/1_2/".to_string());
        assert_eq!(l.twitter_url, "https://www.smule.com/c/1_2/twitter");
        let l = PerformanceLink::from_page_url("https://www.smule.com/c/1_2".to_string());
        assert_eq!(l.twitter_url, "https://www.smule.com/c/1_2/twitter");
    }

    #[test]
    fn key_is_last_segment() {
        let l = PerformanceLink::from_page_url(
            "https://www.smule.com/sing-recording/3187786396_5144609973".to_string(),
        );
        assert_eq!(l.key(), Some("3187786396_5144609973"));
        let l = PerformanceLink::from_page_url("https://www.smule.com/c/629883263_5087867325/".to_string());
        assert_eq!(l.key(), Some("629883263_5087867325"));
    }
}
