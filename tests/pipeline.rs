use async_trait::async_trait;
use codenour::config::{MountOrder, SiteConfig};
use codenour::content::{Converter, MarkdownRenderer};
use codenour::error::{ConvertError, FeedError, FetchError, ManifestError};
use codenour::feed::{Card, Container, FeedController, FeedOutcome, FeedReport};
use codenour::fetch::{Fetcher, Timed};
use codenour::page::Page;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

enum Doc {
    Body(&'static str),
    Slow(&'static str, u64),
    Hang,
}

/// In-memory site that records every request
#[derive(Default)]
struct MemorySite {
    docs: HashMap<String, Doc>,
    requests: Mutex<Vec<String>>,
}

impl MemorySite {
    fn with(mut self, path: &str, body: &'static str) -> Self {
        self.docs.insert(path.to_string(), Doc::Body(body));
        self
    }

    fn slow(mut self, path: &str, body: &'static str, millis: u64) -> Self {
        self.docs.insert(path.to_string(), Doc::Slow(body, millis));
        self
    }

    fn hanging(mut self, path: &str) -> Self {
        self.docs.insert(path.to_string(), Doc::Hang);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Fetcher for MemorySite {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.requests.lock().push(path.to_string());
        match self.docs.get(path) {
            Some(Doc::Body(body)) => Ok(body.to_string()),
            Some(Doc::Slow(body, millis)) => {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
                Ok(body.to_string())
            }
            Some(Doc::Hang) => std::future::pending().await,
            None => Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }
}

/// Markdown renderer that refuses documents containing `BROKEN`
struct Picky(MarkdownRenderer);

impl Converter for Picky {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError> {
        if markdown.contains("BROKEN") {
            return Err(ConvertError("refused".to_string()));
        }
        self.0.convert(markdown)
    }
}

fn converter() -> Option<Arc<dyn Converter>> {
    Some(Arc::new(Picky(MarkdownRenderer::new())))
}

fn news_site() -> MemorySite {
    MemorySite::default()
        .with(
            "news/index.json",
            r#"[
                {"file": "one.md", "date": "2024-01-01"},
                {"file": "missing.md", "date": "2024-01-02"},
                {"file": "three.md", "date": "2024-01-03"},
                {"date": "no file"},
                {"file": "broken.md", "date": "2024-01-05"},
                {"file": "six.md", "date": "2024-01-06"}
            ]"#,
        )
        .with("news/one.md", "# One\n\nFirst.")
        .with("news/three.md", "# Three\n\nThird.")
        .with("news/broken.md", "BROKEN")
        .with("news/six.md", "# Six\n\nSixth.")
}

fn tags(container: &Container) -> Vec<String> {
    container
        .cards()
        .into_iter()
        .map(|card| match card {
            Card::Article { tag, .. } => tag,
            Card::Fallback { path } => format!("fallback:{}", path),
            other => panic!("unexpected card: {:?}", other),
        })
        .collect()
}

#[tokio::test]
async fn every_entry_gets_exactly_one_card() {
    let config = SiteConfig::default();
    let site = Arc::new(news_site());
    let controller = FeedController::news(&config, site.clone(), converter());
    let page = Page::for_site(&config);

    let outcome = controller.run(&page).await;
    assert!(matches!(
        outcome,
        FeedOutcome::Loaded(FeedReport { items: 6, failed: 3 })
    ));

    let container = page.mount_point("news-container").unwrap();
    let cards = container.cards();
    assert_eq!(cards.len(), 6);
    assert_eq!(cards.iter().filter(|c| c.is_fallback()).count(), 3);
}

#[tokio::test]
async fn manifest_order_is_preserved_when_requested() {
    let mut config = SiteConfig::default();
    config.mount_order = MountOrder::Manifest;
    let site = Arc::new(news_site());
    let controller = FeedController::news(&config, site, converter());
    let page = Page::for_site(&config);

    controller.run(&page).await;

    assert_eq!(
        tags(&page.mount_point("news-container").unwrap()),
        [
            "2024-01-01",
            "fallback:missing.md",
            "2024-01-03",
            "fallback:manifest entry 4",
            "fallback:broken.md",
            "2024-01-06",
        ]
    );
}

#[tokio::test]
async fn manifest_404_renders_feed_error_without_loading_items() {
    let config = SiteConfig::default();
    let site = Arc::new(MemorySite::default().with("news/one.md", "# One"));
    let controller = FeedController::news(&config, site.clone(), converter());
    let page = Page::for_site(&config);

    let outcome = controller.run(&page).await;
    assert!(matches!(
        outcome,
        FeedOutcome::Failed(FeedError::Manifest(ManifestError::Fetch(
            FetchError::Status { status: 404, .. }
        )))
    ));
    assert_eq!(site.requests(), vec!["news/index.json".to_string()]);

    let container = page.mount_point("news-container").unwrap();
    let cards = container.cards();
    assert_eq!(cards.len(), 1);
    match &cards[0] {
        Card::FeedError {
            heading, message, ..
        } => {
            assert_eq!(heading, "Unable to Load News");
            assert_eq!(message, &config.messages.server);
        }
        other => panic!("unexpected card: {:?}", other),
    }
}

#[tokio::test]
async fn malformed_manifest_is_feed_fatal() {
    let config = SiteConfig::default();
    let site = Arc::new(MemorySite::default().with("games/index.json", "{ nope"));
    let controller = FeedController::games(&config, site, converter());
    let page = Page::for_site(&config);

    let outcome = controller.run(&page).await;
    assert!(matches!(
        outcome,
        FeedOutcome::Failed(FeedError::Manifest(ManifestError::Parse { .. }))
    ));
    assert_eq!(page.mount_point("games-container").unwrap().len(), 1);
}

#[tokio::test]
async fn missing_capability_fails_before_fetching() {
    let config = SiteConfig::default();
    let site = Arc::new(news_site());
    let controller = FeedController::news(&config, site.clone(), None);
    let page = Page::for_site(&config);

    let outcome = controller.run(&page).await;
    assert!(matches!(
        outcome,
        FeedOutcome::Failed(FeedError::CapabilityUnavailable)
    ));
    assert!(site.requests().is_empty());

    let html = page
        .mount_point("news-container")
        .unwrap()
        .to_html(|| Duration::ZERO);
    assert!(html.contains("Please run a local web server to view this page."));
}

#[tokio::test]
async fn absent_mount_point_is_a_no_op() {
    let config = SiteConfig::default();
    let site = Arc::new(news_site());
    let controller = FeedController::news(&config, site.clone(), converter());
    let page = Page::new().with_mount("games-container");

    assert!(matches!(controller.run(&page).await, FeedOutcome::Skipped));
    assert!(site.requests().is_empty());
}

#[tokio::test]
async fn one_feed_failing_leaves_the_other_intact() {
    let config = SiteConfig::default();
    let site: Arc<MemorySite> = Arc::new(
        MemorySite::default()
            .with(
                "games/index.json",
                r#"[{"id": "void", "file": "void.md", "title": "Void", "status": "ALPHA"}]"#,
            )
            .with("games/void.md", "# Void\n\nSpace."),
    );
    let page = Page::for_site(&config);
    let news = FeedController::news(&config, site.clone(), converter());
    let games = FeedController::games(&config, site, converter());

    let (news, games) = tokio::join!(news.run(&page), games.run(&page));
    assert!(matches!(news, FeedOutcome::Failed(_)));
    assert!(matches!(
        games,
        FeedOutcome::Loaded(FeedReport { items: 1, failed: 0 })
    ));
}

#[tokio::test]
async fn games_mount_cards_then_fill_previews() {
    let config = SiteConfig::default();
    let site = Arc::new(
        MemorySite::default()
            .with(
                "games/index.json",
                r#"[
                    {"id": "void", "file": "void.md", "title": "Void", "status": "ALPHA"},
                    {"file": "nameless.md", "title": "Nameless"},
                    {"id": "ghost", "file": "ghost.md", "title": "Ghost", "status": "SOON"}
                ]"#,
            )
            .with("games/void.md", "# Void\n\nA roguelite in space.\nMore."),
    );
    let controller = FeedController::games(&config, site, converter());
    let page = Page::for_site(&config);

    let outcome = controller.run(&page).await;
    assert!(matches!(
        outcome,
        FeedOutcome::Loaded(FeedReport { items: 3, failed: 1 })
    ));

    let cards = page.mount_point("games-container").unwrap().cards();
    assert_eq!(cards.len(), 3);
    match (&cards[0], &cards[1], &cards[2]) {
        (Card::Game(void), Card::Fallback { .. }, Card::Game(ghost)) => {
            assert_eq!(void.preview.get(), Some("A roguelite in space."));
            // ghost.md is missing: the card stays, the preview stays empty
            assert_eq!(ghost.preview.get(), None);
        }
        other => panic!("unexpected cards: {:?}", other),
    }
}

#[tokio::test]
async fn fan_out_is_not_serialized() {
    let config = SiteConfig::default();
    let site = Arc::new(
        MemorySite::default()
            .with(
                "news/index.json",
                r#"[{"file": "slow.md", "date": "first"}, {"file": "fast.md", "date": "second"}]"#,
            )
            .hanging("news/slow.md")
            .with("news/fast.md", "# Fast"),
    );
    let controller = Arc::new(FeedController::news(&config, site, converter()));
    let container = Container::new("news-container");

    let task = {
        let controller = Arc::clone(&controller);
        let container = container.clone();
        tokio::spawn(async move { controller.run_in(&container).await })
    };

    let mounted = tokio::time::timeout(Duration::from_secs(5), async {
        while container.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(mounted.is_ok(), "second item never mounted");

    assert_eq!(tags(&container), ["second"]);
    assert!(!task.is_finished());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn overlapping_passes_never_clear_mid_fan_out() {
    let config = SiteConfig::default();
    let site = Arc::new(
        MemorySite::default()
            .with(
                "news/index.json",
                r#"[
                    {"file": "a.md", "date": "a"},
                    {"file": "b.md", "date": "b"},
                    {"file": "c.md", "date": "c"}
                ]"#,
            )
            .slow("news/a.md", "# A", 20)
            .slow("news/b.md", "# B", 20)
            .slow("news/c.md", "# C", 20),
    );
    let controller = FeedController::news(&config, site.clone(), converter());
    let container = Container::new("news-container");

    let (first, second) = tokio::join!(controller.run_in(&container), controller.run_in(&container));
    assert_eq!(first.unwrap(), FeedReport { items: 3, failed: 0 });
    assert_eq!(second.unwrap(), FeedReport { items: 3, failed: 0 });

    // the second pass only starts once the first has settled every item
    assert_eq!(container.len(), 3);
    let requests = site.requests();
    let second_manifest = requests
        .iter()
        .rposition(|p| p == "news/index.json")
        .unwrap();
    assert_eq!(second_manifest, 4, "requests: {:?}", requests);
}

#[tokio::test(start_paused = true)]
async fn timed_out_item_falls_back_without_failing_the_feed() {
    let config = SiteConfig::default();
    let site = MemorySite::default()
        .with(
            "news/index.json",
            r#"[{"file": "stuck.md", "date": "stuck"}, {"file": "ok.md", "date": "ok"}]"#,
        )
        .hanging("news/stuck.md")
        .with("news/ok.md", "# Ok");
    let fetcher: Arc<dyn Fetcher> = Arc::new(Timed::new(site, Some(Duration::from_millis(50))));
    let controller = FeedController::news(&config, fetcher, converter());
    let container = Container::new("news-container");

    let report = controller.run_in(&container).await.unwrap();
    assert_eq!(report, FeedReport { items: 2, failed: 1 });
    assert_eq!(tags(&container), ["ok", "fallback:stuck.md"]);
}
