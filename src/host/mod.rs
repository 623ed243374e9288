//! Capabilities the engine needs from its environment.
//!
//! In a browser these are backed by the router, `window.history`, the DOM
//! and the smooth-scroll engine (see the `web` feature). Tests and
//! headless runs use the in-memory implementations in [`fake`].

pub mod fake;

use crate::error::SegueError;
use crate::geometry::{Rect, Viewport};

/// In-app route changes.
pub trait Router {
    /// Navigate to `href`. The engine learns that the route actually
    /// changed only through a later route observation.
    fn push(&mut self, href: &str) -> Result<(), SegueError>;
}

/// Session history entries written without a route change.
pub trait HistoryPort {
    /// Append a history entry for `url` (`history.pushState`).
    fn push_state(&mut self, url: &str);
}

/// Page chrome that transitions hide or freeze.
pub trait PageChrome {
    /// Opacity of the site navigation bar.
    fn set_nav_opacity(&mut self, opacity: f32);
    /// Whether native document scrolling is disabled (`overflow: hidden`).
    fn set_body_scroll_locked(&mut self, locked: bool);
}

/// Live measurement of rendered elements.
pub trait RectProvider {
    /// Current viewport rectangle of the gallery thumbnail for `slug`.
    ///
    /// Implementations resolve to the rendered image inside the thumbnail
    /// container when there is one, because object-fit cropping makes the
    /// container bounds differ from what is visible. `None` when no such
    /// element is mounted.
    fn thumbnail_rect(&self, slug: &str) -> Option<Rect>;
    /// Current viewport size.
    fn viewport(&self) -> Viewport;
}

/// Every environment capability except the scroll engine, which is owned
/// by the [`ScrollArbiter`](crate::scroll::ScrollArbiter).
pub struct Host {
    /// Route changes.
    pub router: Box<dyn Router>,
    /// History entries.
    pub history: Box<dyn HistoryPort>,
    /// Navigation bar and document overflow.
    pub chrome: Box<dyn PageChrome>,
    /// Element measurement.
    pub rects: Box<dyn RectProvider>,
}

impl Host {
    /// Bundle the capabilities.
    pub fn new(
        router: impl Router + 'static,
        history: impl HistoryPort + 'static,
        chrome: impl PageChrome + 'static,
        rects: impl RectProvider + 'static,
    ) -> Self {
        Self {
            router: Box::new(router),
            history: Box::new(history),
            chrome: Box::new(chrome),
            rects: Box::new(rects),
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
