//! Per-item rendering
//!
//! Every function here settles to a card. Failures are logged and turned into
//! fallback cards so one item can never abort its siblings.

use crate::config::FeedConfig;
use crate::content::{extract_preview, Converter, ManifestEntry};
use crate::error::ItemError;
use crate::fetch::Fetcher;

use super::card::{Card, GameCard, PreviewSlot};

/// Renders manifest entries of one feed
pub struct ItemRenderer<'a> {
    fetcher: &'a dyn Fetcher,
    converter: &'a dyn Converter,
    feed: &'a FeedConfig,
}

impl<'a> ItemRenderer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, converter: &'a dyn Converter, feed: &'a FeedConfig) -> Self {
        Self {
            fetcher,
            converter,
            feed,
        }
    }

    /// Fetch and convert one news document into an article card
    pub async fn render_article(&self, slot: &Result<ManifestEntry, ItemError>) -> Card {
        let entry = match slot {
            Ok(entry) => entry,
            Err(e) => return invalid_entry_card(e),
        };

        match self.load(entry).await {
            Ok(body_html) => Card::Article {
                tag: entry.display_tag.clone(),
                body_html,
            },
            Err(e) => {
                tracing::warn!("Error loading {}: {}", entry.document_path, e);
                Card::Fallback {
                    path: entry.document_path.clone(),
                }
            }
        }
    }

    /// Build a game card from manifest metadata alone. Returns the card and,
    /// for valid entries, the slot its preview should be written to.
    pub fn game_card(&self, slot: &Result<ManifestEntry, ItemError>) -> (Card, Option<PreviewSlot>) {
        match slot {
            Ok(entry) => {
                let game = GameCard::from(entry);
                let preview = game.preview.clone();
                (Card::Game(game), Some(preview))
            }
            Err(e) => (invalid_entry_card(e), None),
        }
    }

    /// Fetch a game's document and fill its preview. Failures are logged only.
    pub async fn load_preview(&self, entry: &ManifestEntry, preview: &PreviewSlot) {
        let path = self.feed.document_path(&entry.document_path);
        match self.fetcher.fetch_text(&path).await {
            Ok(markdown) => {
                preview.fill(extract_preview(&markdown));
            }
            Err(e) => {
                tracing::warn!("Error loading preview for {}: {}", entry.label(), e);
            }
        }
    }

    async fn load(&self, entry: &ManifestEntry) -> Result<String, ItemError> {
        let path = self.feed.document_path(&entry.document_path);
        let markdown = self.fetcher.fetch_text(&path).await?;
        Ok(self.converter.convert(&markdown)?)
    }
}

fn invalid_entry_card(error: &ItemError) -> Card {
    tracing::warn!("{}", error);
    let path = match error {
        ItemError::InvalidEntry { index, .. } => format!("manifest entry {}", index + 1),
        other => other.to_string(),
    };
    Card::Fallback { path }
}
