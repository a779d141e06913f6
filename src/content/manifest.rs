//! Feed manifests (`<feed>/index.json`)
//!
//! A manifest is a JSON array. The array itself must parse, but each element
//! is validated on its own: a malformed element becomes an invalid slot that
//! renders as a fallback card instead of failing the whole feed.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ItemError, ManifestError};
use crate::fetch::Fetcher;

/// Which feed a manifest belongs to. Games entries need an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    News,
    Games,
}

impl FeedKind {
    pub fn name(&self) -> &'static str {
        match self {
            FeedKind::News => "news",
            FeedKind::Games => "games",
        }
    }
}

/// One validated manifest element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub identifier: Option<String>,
    /// Document path relative to the feed's base directory
    pub document_path: String,
    /// Date for news, status for games
    pub display_tag: String,
    pub title: Option<String>,
    pub image_path: Option<String>,
    /// Raw inline style fragment for the tag, taken verbatim from the manifest
    pub status_style: Option<String>,
}

/// On-disk shape of an element
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    id: Option<String>,
    file: Option<String>,
    date: Option<String>,
    status: Option<String>,
    title: Option<String>,
    image: Option<String>,
    #[serde(rename = "statusStyle")]
    status_style: Option<String>,
}

impl ManifestEntry {
    /// Validate one element of the manifest array
    pub fn from_value(index: usize, value: Value, kind: FeedKind) -> Result<Self, ItemError> {
        let invalid = |reason: String| ItemError::InvalidEntry { index, reason };

        let raw: RawEntry = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

        let document_path = raw
            .file
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| invalid("missing \"file\"".to_string()))?;

        if kind == FeedKind::Games && raw.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            return Err(invalid(format!("game {} is missing \"id\"", document_path)));
        }

        Ok(Self {
            identifier: raw.id,
            document_path,
            display_tag: raw.date.or(raw.status).unwrap_or_default(),
            title: raw.title,
            image_path: raw.image,
            status_style: raw.status_style,
        })
    }

    /// Name used in logs: the identifier when present, else the document path
    pub fn label(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.document_path)
    }
}

/// Ordered manifest slots, in source order
#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<Result<ManifestEntry, ItemError>>,
}

impl Manifest {
    /// Parse a manifest body
    pub fn parse(path: &str, body: &str, kind: FeedKind) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(body).map_err(|e| ManifestError::Parse {
            path: path.to_string(),
            source: e,
        })?;

        let Value::Array(items) = value else {
            return Err(ManifestError::NotAList {
                path: path.to_string(),
            });
        };

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| ManifestEntry::from_value(index, item, kind))
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetch and parse a manifest. No retries.
pub async fn load_manifest(
    fetcher: &dyn Fetcher,
    path: &str,
    kind: FeedKind,
) -> Result<Manifest, ManifestError> {
    let body = fetcher.fetch_text(path).await?;
    let manifest = Manifest::parse(path, &body, kind)?;
    tracing::debug!("Loaded manifest {} with {} entries", path, manifest.len());
    Ok(manifest)
}
