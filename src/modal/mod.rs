//! Detail modal
//!
//! ```text
//! Closed --show--> Loading --ok--> Open --dismiss--> Closed
//!                     |
//!                     +--error--> Closed (notice shown)
//! ```
//!
//! A newer `show` always wins: it closes whatever is open and any load that
//! settles after a newer request is discarded.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{FeedConfig, SiteConfig};
use crate::content::Converter;
use crate::error::ModalError;
use crate::feed::ACTIVATION_ATTR;
use crate::fetch::Fetcher;
use crate::page::{Key, KeyGrab, OverlayId, Page};

/// What ended an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    Backdrop,
    CloseButton,
    Escape,
}

/// Where a click inside the overlay landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    /// The dimmed area around the content panel
    Backdrop,
    /// Anywhere inside the content panel except the close control
    Panel,
    CloseButton,
}

/// Attributes of one element on a click's path
pub type ElementAttrs = HashMap<String, String>;

/// How a `show` request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Opened,
    /// A newer request arrived before this one's document loaded
    Superseded,
}

/// The live overlay. Owns the page's key listener until dropped.
#[derive(Debug)]
pub struct ModalSession {
    document: String,
    overlay: OverlayId,
    keys: KeyGrab,
}

#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Loading {
        document: String,
    },
    Open(ModalSession),
}

#[derive(Debug, Default)]
struct Inner {
    state: ModalState,
    generation: u64,
}

pub struct DetailModal {
    page: Arc<Page>,
    fetcher: Arc<dyn Fetcher>,
    converter: Option<Arc<dyn Converter>>,
    feed: FeedConfig,
    failure_notice: String,
    inner: Mutex<Inner>,
}

impl DetailModal {
    /// Modal for game documents
    pub fn new(
        page: Arc<Page>,
        config: &SiteConfig,
        fetcher: Arc<dyn Fetcher>,
        converter: Option<Arc<dyn Converter>>,
    ) -> Self {
        Self {
            page,
            fetcher,
            converter,
            feed: config.feeds.games.clone(),
            failure_notice: config.messages.modal_failure.clone(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Load `document` (relative to the games directory) and open it
    pub async fn show(&self, document: &str) -> Result<ModalOutcome, ModalError> {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            let previous = std::mem::replace(
                &mut inner.state,
                ModalState::Loading {
                    document: document.to_string(),
                },
            );
            self.teardown(previous);
            inner.generation
        };

        let loaded = self.load(document).await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding superseded load of {}", document);
            return Ok(ModalOutcome::Superseded);
        }

        match loaded {
            Ok(html) => {
                let overlay = self.page.attach_overlay(overlay_html(&html));
                let keys = self.page.keys().grab();
                inner.state = ModalState::Open(ModalSession {
                    document: document.to_string(),
                    overlay,
                    keys,
                });
                Ok(ModalOutcome::Opened)
            }
            Err(e) => {
                tracing::error!("Error loading game details {}: {}", document, e);
                inner.state = ModalState::Closed;
                self.page.alert(&self.failure_notice);
                Err(e)
            }
        }
    }

    /// Page-wide click handler. `path` runs from the clicked element outwards;
    /// the closest element carrying the activation attribute names the
    /// document. Returns `None` when the click hit no trigger.
    pub async fn activate(
        &self,
        path: &[ElementAttrs],
    ) -> Option<Result<ModalOutcome, ModalError>> {
        let document = path.iter().find_map(|attrs| attrs.get(ACTIVATION_ATTR))?;
        Some(self.show(document).await)
    }

    /// Route a click inside the overlay. Returns true if it closed the modal.
    pub fn click(&self, target: ModalClick) -> bool {
        match target {
            ModalClick::Backdrop => self.dismiss(Dismiss::Backdrop),
            ModalClick::CloseButton => self.dismiss(Dismiss::CloseButton),
            ModalClick::Panel => false,
        }
    }

    /// Deliver a key press. Only the session holding the key listener reacts.
    pub fn key(&self, key: Key) -> bool {
        let listening = match &self.inner.lock().state {
            ModalState::Open(session) => session.keys.is_active(),
            _ => false,
        };
        listening && key == Key::Escape && self.dismiss(Dismiss::Escape)
    }

    /// Close the open session. Returns false if nothing was open.
    pub fn dismiss(&self, reason: Dismiss) -> bool {
        let mut inner = self.inner.lock();
        if !matches!(inner.state, ModalState::Open(_)) {
            return false;
        }
        let session = std::mem::take(&mut inner.state);
        tracing::debug!("Closing modal ({:?})", reason);
        self.teardown(session);
        true
    }

    pub fn is_open(&self) -> bool {
        matches!(self.inner.lock().state, ModalState::Open(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.inner.lock().state, ModalState::Loading { .. })
    }

    /// Document shown or being loaded, if any
    pub fn current_document(&self) -> Option<String> {
        match &self.inner.lock().state {
            ModalState::Closed => None,
            ModalState::Loading { document } => Some(document.clone()),
            ModalState::Open(session) => Some(session.document.clone()),
        }
    }

    fn teardown(&self, state: ModalState) {
        if let ModalState::Open(session) = state {
            self.page.detach_overlay(session.overlay);
            // dropping the session drops its KeyGrab
        }
    }

    async fn load(&self, document: &str) -> Result<String, ModalError> {
        let converter = self
            .converter
            .as_deref()
            .ok_or(ModalError::CapabilityUnavailable)?;
        let markdown = self
            .fetcher
            .fetch_text(&self.feed.document_path(document))
            .await?;
        Ok(converter.convert(&markdown)?)
    }
}

fn overlay_html(content: &str) -> String {
    format!(
        r#"<div class="modal" style="position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.9); z-index: 9999; overflow-y: auto; padding: 20px;">
    <div class="modal-content" style="max-width: 800px; margin: 50px auto; background: var(--card-bg); padding: 40px; border-radius: 8px; position: relative;">
        <button class="modal-close" style="position: absolute; top: 20px; right: 20px; background: transparent; border: none; color: var(--primary-text); font-size: 2rem; cursor: pointer; line-height: 1;">&times;</button>
        <div class="markdown-content">{}</div>
    </div>
</div>"#,
        content
    )
}
