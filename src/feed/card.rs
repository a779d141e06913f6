//! Card markup
//!
//! Manifest metadata is always escaped before it reaches markup. Converted
//! document HTML and the configured quick-start text are trusted as is.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::helpers::html_escape;

/// Attribute carrying a game's document path; the detail modal's trigger
pub const ACTIVATION_ATTR: &str = "data-game-file";

/// Fill-once slot for a game card's excerpt
#[derive(Debug, Clone, Default)]
pub struct PreviewSlot(Arc<OnceLock<String>>);

impl PreviewSlot {
    /// Set the excerpt. Returns false if it was already set.
    pub fn fill(&self, text: &str) -> bool {
        self.0.set(text.to_string()).is_ok()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}

/// Metadata card for one game
#[derive(Debug, Clone)]
pub struct GameCard {
    pub id: String,
    pub file: String,
    pub title: String,
    pub image: String,
    pub status: String,
    pub status_style: String,
    pub preview: PreviewSlot,
}

/// One mounted unit in a feed container
#[derive(Debug, Clone)]
pub enum Card {
    /// News item with its converted document
    Article { tag: String, body_html: String },
    /// Game item; its preview arrives separately
    Game(GameCard),
    /// Item that failed to load
    Fallback { path: String },
    /// Whole feed failed; the only card in its container
    FeedError {
        heading: String,
        message: String,
        quick_start: String,
    },
}

impl Card {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Card::Fallback { .. })
    }

    /// Render the card with its reveal transition delay
    pub fn to_html(&self, reveal_delay: Duration) -> String {
        let delay = format!("transition-delay: {:.1}s;", reveal_delay.as_secs_f64());
        match self {
            Card::Article { tag, body_html } => format!(
                r#"<div class="card" style="{delay}">
    <div class="card-content">
        <span class="card-tag">{tag}</span>
        <div class="markdown-content">
            {body}
        </div>
    </div>
</div>"#,
                delay = delay,
                tag = html_escape(tag),
                body = body_html,
            ),
            Card::Game(game) => game.to_html(&delay),
            Card::Fallback { path } => format!(
                r#"<div class="card" style="{delay}">
    <div class="card-content">
        <p style="color: #ff4444;">Error loading {path}</p>
    </div>
</div>"#,
                delay = delay,
                path = html_escape(path),
            ),
            Card::FeedError {
                heading,
                message,
                quick_start,
            } => format!(
                r#"<div class="card" style="grid-column: 1/-1; {delay}">
    <div class="card-content">
        <h3 style="color: #ff4444;">⚠️ {heading}</h3>
        <p style="color: var(--secondary-text);">
            {message}<br><br>
            {quick_start}
        </p>
    </div>
</div>"#,
                delay = delay,
                heading = html_escape(heading),
                message = html_escape(message),
                quick_start = quick_start,
            ),
        }
    }
}

impl GameCard {
    fn to_html(&self, delay: &str) -> String {
        let preview = self
            .preview
            .get()
            .map(|text| {
                format!(
                    r#"<p style="font-size: 0.9rem; margin-top: 10px; color: var(--secondary-text);">{}</p>"#,
                    html_escape(text)
                )
            })
            .unwrap_or_default();

        // status_style is a raw fragment by contract; only quotes are neutralised
        // so it cannot close the attribute
        format!(
            r#"<div class="card" style="{delay}">
    <div class="card-img">
        <img src="{image}" alt="{title}">
    </div>
    <div class="card-content">
        <span class="card-tag" style="{style}">{status}</span>
        <h3>{title}</h3>
        <div id="{id}-preview" class="game-preview">{preview}</div>
        <button class="btn" data-game-id="{id}" {attr}="{file}">LEARN MORE</button>
    </div>
</div>"#,
            delay = delay,
            image = html_escape(&self.image),
            title = html_escape(&self.title),
            style = self.status_style.replace('"', "&quot;"),
            status = html_escape(&self.status),
            id = html_escape(&self.id),
            preview = preview,
            attr = ACTIVATION_ATTR,
            file = html_escape(&self.file),
        )
    }
}

impl From<&crate::content::ManifestEntry> for GameCard {
    fn from(entry: &crate::content::ManifestEntry) -> Self {
        Self {
            id: entry.identifier.clone().unwrap_or_default(),
            file: entry.document_path.clone(),
            title: entry.title.clone().unwrap_or_default(),
            image: entry.image_path.clone().unwrap_or_default(),
            status: entry.display_tag.clone(),
            status_style: entry.status_style.clone().unwrap_or_default(),
            preview: PreviewSlot::default(),
        }
    }
}
