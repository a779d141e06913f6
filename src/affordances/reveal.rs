//! Reveal-on-scroll
//!
//! An element becomes visible once at least `threshold` of its area lies inside
//! the viewport, with the viewport's bottom edge pulled up by the margin. The
//! visible state is sticky.

use std::time::Duration;

use crate::config::RevealConfig;

/// Element box relative to the viewport's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealId(usize);

#[derive(Debug)]
pub struct RevealObserver {
    threshold: f64,
    bottom_margin: f64,
    stagger: Duration,
    visible: Vec<bool>,
}

impl RevealObserver {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin_px,
            stagger: Duration::from_millis(config.stagger_ms),
            visible: Vec::new(),
        }
    }

    /// Start observing an element. Returns its id and the transition delay
    /// for its position in document order.
    pub fn observe(&mut self) -> (RevealId, Duration) {
        let index = self.visible.len();
        self.visible.push(false);
        (RevealId(index), self.stagger * index as u32)
    }

    /// Re-check an element against the viewport. Returns its visible state.
    pub fn check(&mut self, id: RevealId, rect: Rect, viewport: Viewport) -> bool {
        let Some(visible) = self.visible.get_mut(id.0) else {
            return false;
        };
        if !*visible && intersection_ratio(rect, viewport, self.bottom_margin) >= self.threshold {
            *visible = true;
        }
        *visible
    }

    pub fn is_visible(&self, id: RevealId) -> bool {
        self.visible.get(id.0).copied().unwrap_or(false)
    }
}

/// Fraction of `rect` inside the viewport shrunk by `bottom_margin`
fn intersection_ratio(rect: Rect, viewport: Viewport, bottom_margin: f64) -> f64 {
    let root_bottom = (viewport.height - bottom_margin).max(0.0);

    let left = rect.x.max(0.0);
    let right = (rect.x + rect.width).min(viewport.width);
    let top = rect.y.max(0.0);
    let bottom = (rect.y + rect.height).min(root_bottom);

    if right < left || bottom < top {
        return 0.0;
    }

    let area = rect.width * rect.height;
    if area <= 0.0 {
        // empty boxes count as fully visible once they touch the root
        return 1.0;
    }
    (right - left) * (bottom - top) / area
}
