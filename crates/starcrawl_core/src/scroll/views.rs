//! Views driven directly by the scroll scalar.
//!
//! # Responsibility
//! - `LogoVisibility`: threshold-derived logo flag with change detection.
//! - `TextPanelTransform`: the tilted 3D transform of the crawl text panel.
//!
//! # Invariants
//! - Both views are pure functions of the last scalar they observed.

use crate::config::ScrollConfig;
use crate::scroll::coordinator::ScrollObserver;

/// `visible = scalar >= threshold`, recomputed on every observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoVisibility {
    threshold: f64,
    visible: bool,
    /// Set when the last observation flipped `visible`.
    changed: bool,
}

impl LogoVisibility {
    pub fn new(threshold: f64, initial_scalar: f64) -> Self {
        Self {
            threshold,
            visible: initial_scalar >= threshold,
            changed: false,
        }
    }

    /// Recomputes visibility; returns the new value only when it flipped.
    pub fn observe(&mut self, scalar: f64) -> Option<bool> {
        let visible = scalar >= self.threshold;
        self.changed = visible != self.visible;
        self.visible = visible;
        self.changed.then_some(visible)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the most recent observation changed the flag.
    pub fn last_changed(&self) -> bool {
        self.changed
    }
}

impl ScrollObserver for LogoVisibility {
    fn on_scroll(&mut self, scalar: f64) {
        self.observe(scalar);
    }
}

/// Perspective transform of the text panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPanelTransform {
    pub perspective_px: f64,
    pub tilt_deg: f64,
    pub translate_y_px: f64,
}

impl TextPanelTransform {
    /// Origin the host should pivot the panel around.
    pub const TRANSFORM_ORIGIN: &'static str = "50% 100%";

    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            perspective_px: config.perspective_px,
            tilt_deg: config.tilt_deg,
            translate_y_px: 0.0,
        }
    }

    /// CSS `transform` value, e.g. `rotateX(45deg) translateY(-120px)`.
    pub fn css(&self) -> String {
        format!(
            "rotateX({}deg) translateY({}px)",
            self.tilt_deg, self.translate_y_px
        )
    }

    /// CSS `perspective` value of the container.
    pub fn css_perspective(&self) -> String {
        format!("{}px", self.perspective_px)
    }
}

impl ScrollObserver for TextPanelTransform {
    fn on_scroll(&mut self, scalar: f64) {
        self.translate_y_px = scalar;
    }
}

/// Splits buffer text into crawl rows; empty rows become a single space so
/// the host keeps their height.
pub fn crawl_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                " ".to_string()
            } else {
                line.to_string()
            }
        })
        .collect()
}
