//! `smuledl resolve <link>` – print what a link resolves to without downloading.

use anyhow::Result;
use smuledl_core::config::SmuledlConfig;
use smuledl_core::resolver::{PerformanceResolver, Resolver};

use crate::cli::input;

pub async fn run_resolve(cfg: &SmuledlConfig, link: &str) -> Result<()> {
    let link = input::read_link(link)?;
    let resolver = PerformanceResolver::from_config(cfg)?;
    let media = tokio::task::spawn_blocking(move || resolver.resolve(&link)).await??;

    println!("Title: {}", media.title);
    println!("Type:  {}", media.kind);
    println!("URL:   {}", media.url);
    Ok(())
}
