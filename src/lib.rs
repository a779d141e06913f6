//! codenour: renders the Codenour news and games feeds
//!
//! Each feed is a JSON manifest listing markdown documents. Feeds load
//! concurrently, items within a feed load concurrently, and a failure only
//! ever affects the scope it happened in.

pub mod affordances;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod helpers;
pub mod modal;
pub mod page;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{Converter, MarkdownRenderer};
use feed::{FeedController, FeedOutcome};
use fetch::{Fetcher, FsFetcher, HttpFetcher, Timed};
use page::Page;

/// The main application
#[derive(Clone)]
pub struct Codenour {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the feed folders
    pub site_dir: PathBuf,
    /// Rendered page location
    pub output_path: PathBuf,
}

impl Codenour {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let site_dir = base_dir.join(&config.site_dir);
        let output_path = base_dir.join(&config.output);
        Self {
            config,
            base_dir,
            site_dir,
            output_path,
        }
    }

    /// Document source: the configured origin, else the site directory
    pub fn fetcher(&self) -> Result<Arc<dyn Fetcher>> {
        let timeout = self.config.fetch_timeout();
        Ok(match &self.config.origin {
            Some(origin) => Arc::new(Timed::new(HttpFetcher::new(origin)?, timeout)),
            None => Arc::new(Timed::new(FsFetcher::new(&self.site_dir), timeout)),
        })
    }

    /// Markdown conversion, unless disabled in the config
    pub fn converter(&self) -> Option<Arc<dyn Converter>> {
        self.config
            .markdown
            .enabled
            .then(|| Arc::new(MarkdownRenderer::from_config(&self.config.markdown)) as Arc<dyn Converter>)
    }

    /// Run both feeds against `page` concurrently
    pub async fn run_feeds(&self, page: &Page) -> Result<(FeedOutcome, FeedOutcome)> {
        let fetcher = self.fetcher()?;
        let converter = self.converter();

        let news = FeedController::news(&self.config, Arc::clone(&fetcher), converter.clone());
        let games = FeedController::games(&self.config, fetcher, converter);

        Ok(tokio::join!(news.run(page), games.run(page)))
    }

    /// Render the page to the output file
    pub async fn render(&self) -> Result<()> {
        commands::render::run(self, None).await
    }

    /// Delete the rendered output
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
