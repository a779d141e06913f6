//! Error taxonomy for the content pipeline
//!
//! Each error type belongs to one failure scope. Item errors never become feed
//! errors, and feed errors never escape their controller.

use thiserror::Error;

/// Failure to retrieve a resource through a [`crate::fetch::Fetcher`]
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to load {path}: not found")]
    Missing { path: String },

    #[error("Failed to load {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {path}: {message}")]
    Transport { path: String, message: String },

    #[error("Failed to load {path}: timed out after {millis}ms")]
    Timeout { path: String, millis: u64 },

    #[error("Refusing to load {path}: path escapes the site root")]
    InvalidPath { path: String },
}

/// Failure inside the markdown conversion capability
#[derive(Error, Debug)]
#[error("Conversion failed: {0}")]
pub struct ConvertError(pub String);

/// Failure to produce a usable manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Manifest {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest {path} is not a list of entries")]
    NotAList { path: String },
}

/// Feed-fatal failures. The feed renders a single error card.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Markdown conversion is unavailable")]
    CapabilityUnavailable,

    #[error("Manifest unavailable: {0}")]
    Manifest(#[from] ManifestError),
}

/// Item-local failures. The item renders a fallback card.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Manifest entry {index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Modal-local failures. The modal does not open and a notice is shown.
#[derive(Error, Debug)]
pub enum ModalError {
    #[error("Markdown conversion is unavailable")]
    CapabilityUnavailable,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}
