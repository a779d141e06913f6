//! Feed mount points

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as PassLock, MutexGuard};

use super::Card;

/// A named element that cards are mounted into.
///
/// Cheap to clone; clones share the same cards. Appends are atomic. A render
/// pass holds [`Container::begin_pass`] so two passes never clear each other's
/// cards mid fan-out.
#[derive(Debug, Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    name: String,
    cards: Mutex<Vec<Card>>,
    pass: PassLock<()>,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                cards: Mutex::new(Vec::new()),
                pass: PassLock::new(()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Wait for any running render pass on this container to finish
    pub async fn begin_pass(&self) -> MutexGuard<'_, ()> {
        self.inner.pass.lock().await
    }

    pub fn append(&self, card: Card) {
        self.inner.cards.lock().push(card);
    }

    pub fn clear(&self) {
        self.inner.cards.lock().clear();
    }

    /// Replace all cards with a single one
    pub fn replace_with(&self, card: Card) {
        let mut cards = self.inner.cards.lock();
        cards.clear();
        cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.inner.cards.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the mounted cards
    pub fn cards(&self) -> Vec<Card> {
        self.inner.cards.lock().clone()
    }

    /// Render every card in order, asking `next_delay` for each reveal delay
    pub fn to_html(&self, mut next_delay: impl FnMut() -> Duration) -> String {
        self.inner
            .cards
            .lock()
            .iter()
            .map(|card| card.to_html(next_delay()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
