//! Feed controllers
//!
//! A controller owns one feed's container for the length of a render pass:
//! check the conversion capability, load the manifest, clear the container,
//! then fan out one load per entry and wait for all of them to settle.

use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::card::Card;
use super::container::Container;
use super::item::ItemRenderer;
use crate::config::{FeedConfig, MessagesConfig, MountOrder, SiteConfig};
use crate::content::{load_manifest, Converter, FeedKind, Manifest};
use crate::error::FeedError;
use crate::fetch::Fetcher;
use crate::page::Page;

/// Summary of one successful render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedReport {
    pub items: usize,
    pub failed: usize,
}

/// Result of running a feed against a page
#[derive(Debug)]
pub enum FeedOutcome {
    /// The page has no mount point for this feed
    Skipped,
    Loaded(FeedReport),
    /// The feed rendered its error card instead of items
    Failed(FeedError),
}

/// Drives one feed (news or games)
pub struct FeedController {
    kind: FeedKind,
    feed: FeedConfig,
    messages: MessagesConfig,
    order: MountOrder,
    fetcher: Arc<dyn Fetcher>,
    converter: Option<Arc<dyn Converter>>,
}

impl FeedController {
    pub fn new(
        kind: FeedKind,
        config: &SiteConfig,
        fetcher: Arc<dyn Fetcher>,
        converter: Option<Arc<dyn Converter>>,
    ) -> Self {
        let feed = match kind {
            FeedKind::News => config.feeds.news.clone(),
            FeedKind::Games => config.feeds.games.clone(),
        };
        Self {
            kind,
            feed,
            messages: config.messages.clone(),
            order: config.mount_order,
            fetcher,
            converter,
        }
    }

    pub fn news(
        config: &SiteConfig,
        fetcher: Arc<dyn Fetcher>,
        converter: Option<Arc<dyn Converter>>,
    ) -> Self {
        Self::new(FeedKind::News, config, fetcher, converter)
    }

    pub fn games(
        config: &SiteConfig,
        fetcher: Arc<dyn Fetcher>,
        converter: Option<Arc<dyn Converter>>,
    ) -> Self {
        Self::new(FeedKind::Games, config, fetcher, converter)
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Render into the page's mount point for this feed, if it has one
    pub async fn run(&self, page: &Page) -> FeedOutcome {
        match page.mount_point(&self.feed.mount) {
            Some(container) => match self.run_in(&container).await {
                Ok(report) => FeedOutcome::Loaded(report),
                Err(e) => FeedOutcome::Failed(e),
            },
            None => {
                tracing::debug!("No #{} on this page, skipping {}", self.feed.mount, self.kind.name());
                FeedOutcome::Skipped
            }
        }
    }

    /// Render into `container`. Feed-fatal failures replace its contents with
    /// an error card; item failures only ever produce fallback cards.
    pub async fn run_in(&self, container: &Container) -> Result<FeedReport, FeedError> {
        let _pass = container.begin_pass().await;

        match self.render(container).await {
            Ok(report) => {
                tracing::info!(
                    "Loaded {} {} items ({} failed)",
                    report.items,
                    self.kind.name(),
                    report.failed
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Error initializing {}: {}", self.kind.name(), e);
                container.replace_with(Card::FeedError {
                    heading: self.feed.heading.clone(),
                    message: self.messages.server.clone(),
                    quick_start: self.messages.quick_start.clone(),
                });
                Err(e)
            }
        }
    }

    async fn render(&self, container: &Container) -> Result<FeedReport, FeedError> {
        let converter = self
            .converter
            .as_deref()
            .ok_or(FeedError::CapabilityUnavailable)?;

        let manifest =
            load_manifest(self.fetcher.as_ref(), &self.feed.manifest_path(), self.kind).await?;

        container.clear();

        let renderer = ItemRenderer::new(self.fetcher.as_ref(), converter, &self.feed);
        let failed = match self.kind {
            FeedKind::News => self.render_news(&renderer, &manifest, container).await,
            FeedKind::Games => render_games(&renderer, &manifest, container).await,
        };

        Ok(FeedReport {
            items: manifest.len(),
            failed,
        })
    }

    /// All documents load concurrently; each card mounts when its load settles
    async fn render_news(
        &self,
        renderer: &ItemRenderer<'_>,
        manifest: &Manifest,
        container: &Container,
    ) -> usize {
        let mounter = Mounter::new(container, self.order);

        let loads = manifest.entries.iter().enumerate().map(|(index, slot)| {
            let mounter = &mounter;
            async move {
                let card = renderer.render_article(slot).await;
                let failed = card.is_fallback();
                mounter.mount(index, card);
                failed
            }
        });

        join_all(loads).await.into_iter().filter(|failed| *failed).count()
    }
}

/// Game cards mount immediately in manifest order; previews follow
async fn render_games(
    renderer: &ItemRenderer<'_>,
    manifest: &Manifest,
    container: &Container,
) -> usize {
    let mut failed = 0;
    let mut previews = Vec::new();

    for slot in &manifest.entries {
        let (card, preview) = renderer.game_card(slot);
        if card.is_fallback() {
            failed += 1;
        }
        container.append(card);
        if let (Ok(entry), Some(preview)) = (slot, preview) {
            previews.push((entry, preview));
        }
    }

    join_all(
        previews
            .iter()
            .map(|(entry, preview)| renderer.load_preview(entry, preview)),
    )
    .await;

    failed
}

/// Mounts settled cards either immediately or in manifest order
struct Mounter<'a> {
    container: &'a Container,
    order: MountOrder,
    pending: Mutex<Pending>,
}

#[derive(Default)]
struct Pending {
    next: usize,
    cards: BTreeMap<usize, Card>,
}

impl<'a> Mounter<'a> {
    fn new(container: &'a Container, order: MountOrder) -> Self {
        Self {
            container,
            order,
            pending: Mutex::new(Pending::default()),
        }
    }

    fn mount(&self, index: usize, card: Card) {
        match self.order {
            MountOrder::Ready => self.container.append(card),
            MountOrder::Manifest => {
                let mut pending = self.pending.lock();
                pending.cards.insert(index, card);
                loop {
                    let next = pending.next;
                    match pending.cards.remove(&next) {
                        Some(card) => {
                            self.container.append(card);
                            pending.next += 1;
                        }
                        None => break,
                    }
                }
            }
        }
    }
}
