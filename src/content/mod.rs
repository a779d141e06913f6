//! Content module - manifests, markdown conversion and previews

mod manifest;
mod markdown;
mod preview;

pub use manifest::{load_manifest, FeedKind, Manifest, ManifestEntry};
pub use markdown::{Converter, MarkdownRenderer};
pub use preview::extract_preview;
