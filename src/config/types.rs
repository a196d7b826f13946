use crate::url::extract_domain;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Desktop browser user agent sent with page and resolver requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure, passed explicitly into every component
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the checkpoint, per-category output and logs
    pub data_dir: PathBuf,

    pub sink: SinkConfig,
    pub http: HttpConfig,
    pub listing: ListingConfig,
    pub render: RenderConfig,

    /// Optional TOML file overriding the default extraction rules
    pub rules_path: Option<PathBuf>,
}

/// Remote content table settings
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Base URL of the REST endpoint; required when a credential is set
    pub base_url: Option<Url>,

    /// Access credential; absence turns the sink into a no-op
    pub credential: Option<String>,

    /// Table receiving the records
    pub table: String,

    /// Records per upsert request
    pub batch_size: usize,

    /// Timeout of the sink's HTTP client, applied to every batch request
    pub timeout: Duration,
}

/// Outbound HTTP settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Timeout for page navigation requests
    pub page_timeout: Duration,

    /// Timeout for each redirect-resolution request
    pub resolve_timeout: Duration,
}

/// The listing directory being harvested
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Home page of the listing site
    pub base_url: Url,

    /// Whether redirector links are followed to their real destination
    pub resolve_redirects: bool,
}

/// Page-settling behaviour after navigation
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Upper bound on the initial wait for the page to settle
    pub settle_timeout: Duration,

    /// Number of scroll passes used to trigger lazily loaded content
    pub scroll_passes: u32,

    /// Pixels scrolled per pass
    pub scroll_step_px: u32,

    /// Upper bound on the wait after each scroll pass
    pub scroll_wait: Duration,
}

impl Config {
    pub fn checkpoint_path(&self) -> PathBuf {
        self.data_dir.join("checkpoint.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("scrape.log")
    }
}

impl ListingConfig {
    /// Host of the listing site, used to recognise its redirector links
    pub fn domain(&self) -> String {
        extract_domain(&self.base_url).unwrap_or_default()
    }
}
