use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// User agent of a recent Android WebView; the site serves full pages to it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8 Pro Build/UD1A.230805.019; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/131.0.6778.135 Mobile Safari/537.36";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/smuledl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmuledlConfig {
    /// Origin of the performance site; redirect endpoint and bare paths are resolved against it.
    pub site_origin: String,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Accept-Language sent with page requests.
    pub accept_language: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Timeout for page and redirect requests in seconds (downloads use a low-speed limit instead).
    pub request_timeout_secs: u64,
    /// Substring that marks a file in the download directory as one of ours.
    pub library_tag: String,
    /// Where downloads go; `None` = `$HOME/Downloads`, or the current directory without `$HOME`.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for SmuledlConfig {
    fn default() -> Self {
        Self {
            site_origin: "https://www.smule.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            library_tag: "Smule".to_string(),
            download_dir: None,
            retry: None,
        }
    }
}

impl SmuledlConfig {
    /// Download directory after applying the `$HOME/Downloads` default.
    pub fn resolved_download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join("Downloads")),
            _ => Ok(std::env::current_dir()?),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("smuledl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SmuledlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SmuledlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SmuledlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
