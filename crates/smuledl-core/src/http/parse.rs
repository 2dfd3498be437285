//! Parse HTTP response header lines into ResponseHead.

/// Status line and the headers the pipeline cares about, from the last
/// response in a redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// URL that produced this response (after redirects, when followed).
    pub final_url: String,
}

impl ResponseHead {
    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse collected header lines. With redirects followed, libcurl reports one
/// header block per hop; each status line starts a fresh block.
pub fn parse_head(lines: &[String], final_url: &str) -> ResponseHead {
    let mut head = ResponseHead {
        final_url: final_url.to_string(),
        ..ResponseHead::default()
    };

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                status: parse_status_line(line).unwrap_or(0),
                final_url: final_url.to_string(),
                ..ResponseHead::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") {
                head.location = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-length") {
                head.content_length = value.parse::<u64>().ok();
            }
        }
    }

    head
}

fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
