//! Render the page

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::feed::FeedOutcome;
use crate::page::Page;
use crate::Codenour;

/// Render both feeds into a fresh page and write it out
pub async fn run(app: &Codenour, output: Option<&Path>) -> Result<()> {
    let page = Page::for_site(&app.config);
    render_into(app, &page, output).await
}

/// Run both feeds against `page` and write the result. Every pass clears and
/// rebuilds the feed containers, so a page can be rendered repeatedly.
pub async fn render_into(app: &Codenour, page: &Page, output: Option<&Path>) -> Result<()> {
    let start = Instant::now();

    let (news, games) = app.run_feeds(page).await?;
    report("news", &news);
    report("games", &games);

    let html = page.render(&app.config)?;
    let output = output.unwrap_or(app.output_path.as_path());
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, html)?;

    tracing::info!(
        "Rendered {:?} in {:.2}s",
        output,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn report(name: &str, outcome: &FeedOutcome) {
    match outcome {
        FeedOutcome::Skipped => tracing::debug!("{}: no mount point", name),
        FeedOutcome::Loaded(report) if report.failed > 0 => tracing::warn!(
            "{}: {} of {} items failed to load",
            name,
            report.failed,
            report.items
        ),
        FeedOutcome::Loaded(report) => tracing::debug!("{}: {} items", name, report.items),
        FeedOutcome::Failed(e) => tracing::warn!("{}: feed unavailable ({})", name, e),
    }
}

/// What a filesystem event means for the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Ignored,
    Content,
    Config,
}

/// Sorts watcher events. Paths are compared canonicalized, since the watcher
/// reports them in whatever form the watched root was given.
struct WatchFilter {
    output: PathBuf,
    config: PathBuf,
}

impl WatchFilter {
    fn new(output: &Path, config: &Path) -> Self {
        Self {
            output: canonical(output),
            config: canonical(config),
        }
    }

    fn classify(&self, path: &Path) -> Change {
        let path = canonical(path);
        if path == self.output {
            return Change::Ignored;
        }
        if path == self.config {
            return Change::Config;
        }
        let editor_noise = path.components().any(|c| c.as_os_str() == ".git")
            || path.file_name().is_some_and(|name| name == ".DS_Store")
            || path.to_string_lossy().ends_with('~');
        if editor_noise {
            Change::Ignored
        } else {
            Change::Content
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Re-render whenever something under the site directory changes. A change to
/// `_config.yml` reloads the configuration first; the output location stays
/// fixed for the session.
pub async fn watch(app: &Codenour, output: Option<&Path>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            let _ = tx.send(result);
        },
    )?;
    let site_dir = canonical(&app.site_dir);
    debouncer
        .watcher()
        .watch(&site_dir, RecursiveMode::Recursive)?;

    let config_path = canonical(&app.base_dir.join("_config.yml"));
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    let output = output.unwrap_or(app.output_path.as_path()).to_path_buf();

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", site_dir);

    let mut app = app.clone();
    let mut page = Page::for_site(&app.config);
    render_into(&app, &page, Some(&output)).await?;
    let filter = WatchFilter::new(&output, &config_path);

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changes: Vec<Change> = events.iter().map(|e| filter.classify(&e.path)).collect();
                if changes.iter().all(|c| *c == Change::Ignored) {
                    continue;
                }

                if changes.contains(&Change::Config) {
                    match Codenour::new(&app.base_dir) {
                        Ok(fresh) => {
                            tracing::info!("Configuration changed, reloading...");
                            app = fresh;
                            page = Page::for_site(&app.config);
                        }
                        Err(e) => {
                            tracing::error!("Keeping previous configuration: {}", e);
                        }
                    }
                }

                tracing::info!("Change detected, re-rendering...");
                if let Err(e) = render_into(&app, &page, Some(&output)).await {
                    tracing::error!("Render failed: {}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("news")).unwrap();
        fs::create_dir_all(root.join("games")).unwrap();
        fs::write(
            root.join("news/index.json"),
            r#"[{"file": "launch.md", "date": "2024-05-01"}, {"file": "missing.md", "date": "2024-05-02"}]"#,
        )
        .unwrap();
        fs::write(root.join("news/launch.md"), "# Launch\n\nWe are live.").unwrap();
        fs::write(
            root.join("games/index.json"),
            r#"[{"id": "void", "file": "void.md", "title": "Void Runner", "status": "ALPHA", "image": "img/void.png"}]"#,
        )
        .unwrap();
        fs::write(root.join("games/void.md"), "# Void Runner\n\nDodge the dark.").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_render_writes_page() {
        let dir = site();
        let app = Codenour::new(dir.path()).unwrap();
        run(&app, None).await.unwrap();

        let html = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(html.contains("<h1>Launch</h1>"));
        assert!(html.contains("Error loading missing.md"));
        assert!(html.contains("Void Runner"));
        assert!(html.contains("Dodge the dark."));
        assert!(html.contains(r#"data-game-file="void.md""#));
    }

    #[tokio::test]
    async fn test_rerender_does_not_duplicate_cards() {
        let dir = site();
        let app = Codenour::new(dir.path()).unwrap();
        let page = Page::for_site(&app.config);
        render_into(&app, &page, None).await.unwrap();
        render_into(&app, &page, None).await.unwrap();
        assert_eq!(page.mount_point("news-container").unwrap().len(), 2);
        assert_eq!(page.mount_point("games-container").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_markdown_renders_error_cards() {
        let dir = site();
        let mut config = SiteConfig::default();
        config.markdown.enabled = false;
        let app = Codenour::with_config(dir.path().to_path_buf(), config);
        let output = dir.path().join("out/page.html");
        run(&app, Some(&output)).await.unwrap();

        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains("Unable to Load News"));
        assert!(html.contains("Unable to Load Games"));
        assert!(html.contains("python3 -m http.server 8000"));
    }

    #[test]
    fn test_watch_filter_skips_own_output() {
        let dir = site();
        let root = dir.path();
        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("public/index.html"), "<html></html>").unwrap();
        fs::write(root.join("_config.yml"), "title: Codenour\n").unwrap();

        let filter = WatchFilter::new(&root.join("public/index.html"), &root.join("_config.yml"));

        // the watcher reports paths in the form the root was given
        let roundabout = root.join("news").join("..").join("public").join("index.html");
        assert_eq!(filter.classify(&roundabout), Change::Ignored);
        assert_eq!(filter.classify(&root.join("public/index.html")), Change::Ignored);

        assert_eq!(filter.classify(&root.join("news/index.json")), Change::Content);
        assert_eq!(
            filter.classify(&root.join("games").join("..").join("_config.yml")),
            Change::Config
        );
        assert_eq!(filter.classify(&root.join(".git/HEAD")), Change::Ignored);
        assert_eq!(filter.classify(&root.join(".DS_Store")), Change::Ignored);
        assert_eq!(filter.classify(&root.join("news/launch.md~")), Change::Ignored);
    }
}
