//! Link argument handling: `-` reads the link from stdin (piped share text).

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead};

/// Returns the link to resolve: `arg` itself, or the first URL-looking token from `reader`
/// when `arg` is `-`. Shared text often wraps the link in a sentence.
pub fn read_link_from<R: BufRead>(arg: &str, reader: R) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut fallback: Option<String> = None;
    for line in reader.lines() {
        let line = line.context("read link from stdin")?;
        if let Some(url) = line
            .split_whitespace()
            .find(|t| t.starts_with("http://") || t.starts_with("https://"))
        {
            return Ok(url.to_string());
        }
        if fallback.is_none() && !line.trim().is_empty() {
            fallback = Some(line.trim().to_string());
        }
    }
    match fallback {
        Some(link) => Ok(link),
        None => bail!("no link on stdin"),
    }
}

pub fn read_link(arg: &str) -> Result<String> {
    read_link_from(arg, io::stdin().lock())
}
