//! Print a document's card excerpt

use anyhow::Result;

use crate::content::extract_preview;
use crate::Codenour;

pub async fn run(app: &Codenour, feed: &str, document: &str) -> Result<()> {
    let feed = match feed {
        "news" => &app.config.feeds.news,
        "games" => &app.config.feeds.games,
        _ => anyhow::bail!("Unknown feed: {}. Available: news, games", feed),
    };

    let markdown = app
        .fetcher()?
        .fetch_text(&feed.document_path(document))
        .await?;
    println!("{}", extract_preview(&markdown));
    Ok(())
}
