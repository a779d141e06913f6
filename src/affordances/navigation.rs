//! Page transition on same-site navigation

use std::time::Duration;

use crate::config::TransitionConfig;

/// A click on a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClick {
    pub href: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl LinkClick {
    pub fn plain(href: &str) -> Self {
        Self {
            href: href.to_string(),
            ctrl: false,
            meta: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    /// Leave the click to the browser
    Default,
    /// Play the transition, then navigate to `href`
    Transition { href: String },
}

/// Browser side of a navigation
pub trait Navigator: Send + Sync {
    /// Activate the transition overlay
    fn begin_transition(&self);
    fn navigate(&self, href: &str);
}

#[derive(Debug, Clone)]
pub struct NavigationInterceptor {
    prefixes: Vec<String>,
    delay: Duration,
}

impl NavigationInterceptor {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            prefixes: config.links.clone(),
            delay: config.delay(),
        }
    }

    /// Only unmodified clicks on recognised same-site links are intercepted
    pub fn decide(&self, click: &LinkClick) -> NavDecision {
        let recognised = self
            .prefixes
            .iter()
            .any(|prefix| click.href.starts_with(prefix.as_str()));
        if recognised && !click.ctrl && !click.meta {
            NavDecision::Transition {
                href: click.href.clone(),
            }
        } else {
            NavDecision::Default
        }
    }

    /// Handle a click. Intercepted clicks navigate after the transition delay;
    /// everything else is left to the navigator's default behaviour.
    pub async fn handle(&self, click: &LinkClick, navigator: &dyn Navigator) -> NavDecision {
        let decision = self.decide(click);
        if let NavDecision::Transition { href } = &decision {
            navigator.begin_transition();
            tokio::time::sleep(self.delay).await;
            tracing::debug!("Navigating to {}", href);
            navigator.navigate(href);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        transitions: Mutex<usize>,
        visited: Mutex<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn begin_transition(&self) {
            *self.transitions.lock() += 1;
        }

        fn navigate(&self, href: &str) {
            self.visited.lock().push(href.to_string());
        }
    }

    fn interceptor() -> NavigationInterceptor {
        NavigationInterceptor::new(&TransitionConfig::default())
    }

    #[test]
    fn test_decide() {
        let nav = interceptor();
        assert_eq!(
            nav.decide(&LinkClick::plain("games.html#void")),
            NavDecision::Transition {
                href: "games.html#void".to_string()
            }
        );
        assert_eq!(
            nav.decide(&LinkClick::plain("https://example.com/games.html")),
            NavDecision::Default
        );
        assert_eq!(nav.decide(&LinkClick::plain("contact.html")), NavDecision::Default);

        let mut ctrl = LinkClick::plain("news.html");
        ctrl.ctrl = true;
        assert_eq!(nav.decide(&ctrl), NavDecision::Default);

        let mut meta = LinkClick::plain("news.html");
        meta.meta = true;
        assert_eq!(nav.decide(&meta), NavDecision::Default);
    }

    #[tokio::test(start_paused = true)]
    async fn test_modified_click_is_not_intercepted() {
        let nav = interceptor();
        let recorder = Recorder::default();
        let mut click = LinkClick::plain("about.html");
        click.ctrl = true;

        assert_eq!(nav.handle(&click, &recorder).await, NavDecision::Default);
        assert_eq!(*recorder.transitions.lock(), 0);
        assert!(recorder.visited.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigates_after_delay() {
        let nav = interceptor();
        let recorder = Arc::new(Recorder::default());

        let task = {
            let recorder = Arc::clone(&recorder);
            tokio::spawn(async move {
                nav.handle(&LinkClick::plain("games.html"), recorder.as_ref())
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(*recorder.transitions.lock(), 1);
        assert!(recorder.visited.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*recorder.visited.lock(), vec!["games.html".to_string()]);
        assert!(matches!(task.await.unwrap(), NavDecision::Transition { .. }));
    }
}
