//! Page document
//!
//! The in-process stand-in for the browser page: named mount points for the
//! feeds, an overlay layer for the detail modal, a queue of blocking notices
//! and the single key listener slot.

mod keys;

pub use keys::{Key, KeyBus, KeyGrab};

use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::affordances::RevealObserver;
use crate::config::SiteConfig;
use crate::feed::Container;
use crate::templates::{PageData, SectionData, TemplateRenderer};

/// Handle to an attached overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

#[derive(Debug, Default)]
struct Layers {
    next_id: u64,
    overlays: Vec<(OverlayId, String)>,
    notices: Vec<String>,
}

#[derive(Debug)]
pub struct Page {
    mounts: HashMap<String, Container>,
    layers: Mutex<Layers>,
    keys: Arc<KeyBus>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// An empty page with no mount points
    pub fn new() -> Self {
        Self {
            mounts: HashMap::new(),
            layers: Mutex::new(Layers::default()),
            keys: KeyBus::new(),
        }
    }

    /// A page carrying both feed mount points
    pub fn for_site(config: &SiteConfig) -> Self {
        Self::new()
            .with_mount(&config.feeds.news.mount)
            .with_mount(&config.feeds.games.mount)
    }

    pub fn with_mount(mut self, name: &str) -> Self {
        self.mounts
            .insert(name.to_string(), Container::new(name.to_string()));
        self
    }

    pub fn mount_point(&self, name: &str) -> Option<Container> {
        self.mounts.get(name).cloned()
    }

    pub fn keys(&self) -> &Arc<KeyBus> {
        &self.keys
    }

    pub fn attach_overlay(&self, html: String) -> OverlayId {
        let mut layers = self.layers.lock();
        layers.next_id += 1;
        let id = OverlayId(layers.next_id);
        layers.overlays.push((id, html));
        id
    }

    /// Returns false if the overlay was not attached
    pub fn detach_overlay(&self, id: OverlayId) -> bool {
        let mut layers = self.layers.lock();
        let before = layers.overlays.len();
        layers.overlays.retain(|(overlay, _)| *overlay != id);
        layers.overlays.len() != before
    }

    pub fn overlays(&self) -> Vec<String> {
        self.layers
            .lock()
            .overlays
            .iter()
            .map(|(_, html)| html.clone())
            .collect()
    }

    /// Show a blocking notice to the user
    pub fn alert(&self, message: &str) {
        self.layers.lock().notices.push(message.to_string());
    }

    pub fn notices(&self) -> Vec<String> {
        self.layers.lock().notices.clone()
    }

    /// Render the whole page to HTML
    pub fn render(&self, config: &SiteConfig) -> Result<String> {
        let renderer = TemplateRenderer::new()?;
        // reveal delays follow document order across both sections
        let mut reveal = RevealObserver::new(&config.reveal);

        let sections = [
            (&config.feeds.news.mount, "LATEST NEWS"),
            (&config.feeds.games.mount, "OUR GAMES"),
        ]
        .into_iter()
        .filter_map(|(mount, title)| {
            let container = self.mount_point(mount)?;
            let (_, title_delay) = reveal.observe();
            Some(SectionData {
                id: mount.clone(),
                title: title.to_string(),
                title_delay: css_delay(title_delay),
                cards: container.to_html(|| reveal.observe().1),
            })
        })
        .collect();
        let (_, footer_delay) = reveal.observe();

        let data = PageData {
            title: config.title.clone(),
            sections,
            overlays: self.overlays(),
            notices: self.notices(),
            nav_links: config.transition.links.clone(),
            footer_delay: css_delay(footer_delay),
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        renderer.render_page(&data)
    }
}

fn css_delay(delay: Duration) -> String {
    format!("{:.1}s", delay.as_secs_f64())
}
