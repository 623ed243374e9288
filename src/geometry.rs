//! Viewport-relative rectangles and their interpolation.
//!
//! All coordinates are CSS pixels relative to the viewport's top-left
//! corner, the same space `getBoundingClientRect()` reports in.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the top of the viewport.
    pub top: f32,
    /// Distance from the left of the viewport.
    pub left: f32,
    /// Rendered width.
    pub width: f32,
    /// Rendered height.
    pub height: f32,
}

impl Rect {
    /// Rectangle from its four components.
    #[must_use]
    pub const fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge (`top + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Right edge (`left + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Vertical center, used as the seam of a split-reveal cover.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// Whether the rectangle has no visible area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Linear interpolation toward `other`. `t` is not clamped so eased
    /// curves with overshoot still map through.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        // Endpoints are returned verbatim so the first and last rendered
        // frames are pixel-aligned with the measured rectangles.
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }
        Self::from_vec4(self.to_vec4().lerp(other.to_vec4(), t))
    }

    /// Largest per-component distance to `other`.
    #[must_use]
    pub fn max_delta(&self, other: &Self) -> f32 {
        (self.to_vec4() - other.to_vec4()).abs().max_element()
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::new(self.top, self.left, self.width, self.height)
    }

    fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

/// A rectangle captured at click time together with the page scroll
/// offset at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapturedRect {
    /// Viewport-relative rectangle of the rendered image.
    pub rect: Rect,
    /// Page scroll offset when the rectangle was measured.
    pub scroll_y: f32,
}

impl CapturedRect {
    /// Document-absolute top of the captured element.
    #[must_use]
    pub fn document_top(&self) -> f32 {
        self.scroll_y + self.rect.top
    }
}

/// Size of the browser viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// `window.innerWidth`.
    pub width: f32,
    /// `window.innerHeight`.
    pub height: f32,
}

impl Viewport {
    /// Viewport of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Full-bleed hero rectangle pinned to the top of the viewport,
    /// `fraction` of the viewport tall.
    #[must_use]
    pub fn hero_rect(&self, fraction: f32) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height * fraction)
    }
}

impl Default for Viewport {
    /// Pre-measurement fallback used before the first resize event.
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Rect::new(120.0, 40.0, 300.0, 400.0);
        let b = Rect::new(0.0, 0.0, 1440.0, 540.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(100.0, 50.0, 300.0, 200.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Rect::new(50.0, 25.0, 200.0, 150.0));
    }

    #[test]
    fn hero_rect_uses_fraction_of_height() {
        let vp = Viewport::new(1000.0, 900.0);
        let hero = vp.hero_rect(0.6);
        assert_eq!(hero, Rect::new(0.0, 0.0, 1000.0, 540.0));
    }

    #[test]
    fn center_and_edges() {
        let r = Rect::new(350.0, 10.0, 20.0, 100.0);
        assert_eq!(r.center_y(), 400.0);
        assert_eq!(r.bottom(), 450.0);
        assert_eq!(r.right(), 30.0);
        assert!(!r.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn document_top_adds_scroll() {
        let c = CapturedRect {
            rect: Rect::new(120.0, 40.0, 300.0, 400.0),
            scroll_y: 250.0,
        };
        assert_eq!(c.document_top(), 370.0);
    }

    #[test]
    fn max_delta_is_largest_component() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(1.0, -3.0, 10.0, 12.0);
        assert_eq!(a.max_delta(&b), 3.0);
    }
}
