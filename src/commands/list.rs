//! List a feed's manifest

use anyhow::Result;

use crate::content::{load_manifest, FeedKind};
use crate::Codenour;

/// List manifest entries of a feed
pub async fn run(app: &Codenour, feed: &str) -> Result<()> {
    let (kind, config) = match feed {
        "news" => (FeedKind::News, &app.config.feeds.news),
        "games" | "game" => (FeedKind::Games, &app.config.feeds.games),
        _ => anyhow::bail!("Unknown feed: {}. Available: news, games", feed),
    };

    let fetcher = app.fetcher()?;
    let manifest = load_manifest(fetcher.as_ref(), &config.manifest_path(), kind).await?;

    println!("{} ({}):", kind.name(), manifest.len());
    for slot in &manifest.entries {
        match slot {
            Ok(entry) => println!(
                "  {} - {} [{}]",
                entry.display_tag,
                entry.title.as_deref().unwrap_or(entry.label()),
                entry.document_path
            ),
            Err(e) => println!("  ! {}", e),
        }
    }

    Ok(())
}
