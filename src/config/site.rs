//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    pub site_dir: String,
    pub output: String,

    // Transport
    /// When set, documents are fetched from this HTTP origin instead of `site_dir`
    pub origin: Option<String>,
    pub fetch_timeout_ms: Option<u64>,

    // Feeds
    #[serde(default)]
    pub feeds: FeedsConfig,
    pub mount_order: MountOrder,

    // Rendering
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub messages: MessagesConfig,

    // Affordances
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CODENOUR".to_string(),

            site_dir: ".".to_string(),
            output: "public/index.html".to_string(),

            origin: None,
            fetch_timeout_ms: None,

            feeds: FeedsConfig::default(),
            mount_order: MountOrder::default(),

            markdown: MarkdownConfig::default(),
            messages: MessagesConfig::default(),

            transition: TransitionConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Per-fetch timeout, if one is configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}

/// How completed item cards are mounted into their container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountOrder {
    /// Mount each card as soon as its load settles
    #[default]
    Ready,
    /// Buffer settled cards and flush them in manifest order
    Manifest,
}

/// Both feeds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FeedsFile")]
pub struct FeedsConfig {
    pub news: FeedConfig,
    pub games: FeedConfig,
}

/// On-disk shape of `feeds`; omitted keys fall back to the feed's own defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedsFile {
    news: FeedOverrides,
    games: FeedOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedOverrides {
    base_dir: Option<String>,
    manifest: Option<String>,
    mount: Option<String>,
    heading: Option<String>,
}

impl FeedOverrides {
    fn apply(self, mut feed: FeedConfig) -> FeedConfig {
        if let Some(base_dir) = self.base_dir {
            feed.base_dir = base_dir;
        }
        if let Some(manifest) = self.manifest {
            feed.manifest = manifest;
        }
        if let Some(mount) = self.mount {
            feed.mount = mount;
        }
        if let Some(heading) = self.heading {
            feed.heading = heading;
        }
        feed
    }
}

impl From<FeedsFile> for FeedsConfig {
    fn from(file: FeedsFile) -> Self {
        let defaults = FeedsConfig::default();
        Self {
            news: file.news.apply(defaults.news),
            games: file.games.apply(defaults.games),
        }
    }
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            news: FeedConfig::new("news", "Unable to Load News"),
            games: FeedConfig::new("games", "Unable to Load Games"),
        }
    }
}

/// One feed's locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Directory that manifest and document paths are relative to
    pub base_dir: String,
    /// Manifest file name inside `base_dir`
    pub manifest: String,
    /// Name of the page mount point
    pub mount: String,
    /// Heading of the feed-level error card
    pub heading: String,
}

impl FeedConfig {
    fn new(name: &str, heading: &str) -> Self {
        Self {
            base_dir: name.to_string(),
            manifest: "index.json".to_string(),
            mount: format!("{}-container", name),
            heading: heading.to_string(),
        }
    }

    /// Path of the manifest, e.g. `news/index.json`
    pub fn manifest_path(&self) -> String {
        join_path(&self.base_dir, &self.manifest)
    }

    /// Path of a document listed in the manifest
    pub fn document_path(&self, file: &str) -> String {
        join_path(&self.base_dir, file)
    }
}

fn join_path(base: &str, file: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() || base == "." {
        file.to_string()
    } else {
        format!("{}/{}", base, file.trim_start_matches('/'))
    }
}

/// Markdown conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// When false, the conversion capability is treated as unavailable
    pub enabled: bool,
    pub highlight: bool,
    pub theme: String,
    pub line_numbers: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight: true,
            theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

/// User-facing failure text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Remediation hint shown on feed-level error cards
    pub server: String,
    /// Trusted markup appended to feed-level error cards
    pub quick_start: String,
    /// Notice shown when a detail view fails to load
    pub modal_failure: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            server: "Please run a local web server to view this page.".to_string(),
            quick_start: concat!(
                "<strong>Quick start:</strong><br>\n",
                "1. Open Terminal in this folder<br>\n",
                "2. Run: <code>python3 -m http.server 8000</code><br>\n",
                "3. Open: <code>http://localhost:8000</code>"
            )
            .to_string(),
            modal_failure: "Failed to load game details. Please try again.".to_string(),
        }
    }
}

/// Navigation transition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub delay_ms: u64,
    /// Same-site link prefixes that get the transition
    pub links: Vec<String>,
}

impl TransitionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 400,
            links: ["index.html", "games.html", "news.html", "about.html"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Reveal-on-scroll settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of an element that must be inside the viewport
    pub threshold: f64,
    /// Viewport bottom edge is pulled up by this many pixels
    pub bottom_margin_px: f64,
    /// Delay step between consecutive revealed elements
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 50.0,
            stagger_ms: 100,
        }
    }
}
