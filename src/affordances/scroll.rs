//! Scroll progress bar

/// Scroll position of the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Vertical scroll offset
    pub offset: f64,
    /// Full document height
    pub scroll_height: f64,
    /// Visible height
    pub client_height: f64,
}

impl ScrollMetrics {
    /// `offset / (scroll_height - client_height)`. A document that cannot
    /// scroll reports zero.
    pub fn fraction(&self) -> f64 {
        let range = self.scroll_height - self.client_height;
        if range <= 0.0 {
            0.0
        } else {
            self.offset / range
        }
    }
}

/// Width of the progress bar, recomputed on every scroll event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollProgress {
    fraction: f64,
}

impl ScrollProgress {
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> f64 {
        self.fraction = metrics.fraction();
        self.fraction
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// CSS width, e.g. `50%`
    pub fn width(&self) -> String {
        format!("{}%", self.fraction * 100.0)
    }
}
