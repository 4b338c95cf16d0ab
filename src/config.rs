use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub page: PageConfig,
}

fn default_feed_url() -> String {
    "https://www.kanpo.go.jp/rss/latest.xml".to_string()
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("data/kanpo_feed.json")
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    #[serde(default = "default_page_path")]
    pub path: PathBuf,
    #[serde(default = "default_start_marker")]
    pub start_marker: String,
    #[serde(default = "default_end_marker")]
    pub end_marker: String,
    /// Render only the most recent entries; the archive keeps everything
    #[serde(default)]
    pub max_entries: Option<usize>,
    /// Region showing the newest issue's PDF; left alone when unset
    #[serde(default)]
    pub latest: Option<LatestConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LatestConfig {
    #[serde(default = "default_latest_start_marker")]
    pub start_marker: String,
    #[serde(default = "default_latest_end_marker")]
    pub end_marker: String,
}

fn default_latest_start_marker() -> String {
    "<!-- KANPO_LATEST_START -->".to_string()
}

fn default_latest_end_marker() -> String {
    "<!-- KANPO_LATEST_END -->".to_string()
}

impl Default for LatestConfig {
    fn default() -> Self {
        Self {
            start_marker: default_latest_start_marker(),
            end_marker: default_latest_end_marker(),
        }
    }
}

fn default_page_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_start_marker() -> String {
    "<!-- KANPO_FEED_START -->".to_string()
}

fn default_end_marker() -> String {
    "<!-- KANPO_FEED_END -->".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: default_page_path(),
            start_marker: default_start_marker(),
            end_marker: default_end_marker(),
            max_entries: None,
            latest: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            archive_path: default_archive_path(),
            request_timeout: default_request_timeout(),
            page: PageConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
