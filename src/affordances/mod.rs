//! Page affordances
//!
//! Scroll progress, reveal-on-scroll and the navigation transition. None of
//! them touch the content pipeline.

mod navigation;
mod reveal;
mod scroll;

pub use navigation::{LinkClick, NavDecision, NavigationInterceptor, Navigator};
pub use reveal::{Rect, RevealId, RevealObserver, Viewport};
pub use scroll::{ScrollMetrics, ScrollProgress};
