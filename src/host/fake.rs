//! In-memory capabilities for tests and headless runs.
//!
//! Each fake is a cheap handle: clone it, hand one copy to the engine and
//! keep the other to inspect what the engine did.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{HistoryPort, PageChrome, RectProvider, Router};
use crate::error::SegueError;
use crate::geometry::{Rect, Viewport};
use crate::scroll::ScrollController;

#[derive(Debug, Default)]
struct ScrollLog {
    suspended: bool,
    suspend_calls: usize,
    resume_calls: usize,
    scroll_y: f32,
    jumps: Vec<f32>,
}

/// Records suspend/resume calls and scroll jumps.
#[derive(Debug, Clone, Default)]
pub struct FakeScroll {
    log: Rc<RefCell<ScrollLog>>,
}

impl FakeScroll {
    /// Whether the engine is currently suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.log.borrow().suspended
    }

    /// Number of `suspend` calls so far.
    #[must_use]
    pub fn suspend_calls(&self) -> usize {
        self.log.borrow().suspend_calls
    }

    /// Number of `resume` calls so far.
    #[must_use]
    pub fn resume_calls(&self) -> usize {
        self.log.borrow().resume_calls
    }

    /// Every `scroll_to` target, in order.
    #[must_use]
    pub fn jumps(&self) -> Vec<f32> {
        self.log.borrow().jumps.clone()
    }

    /// Simulate the user scrolling the page.
    pub fn set_scroll_y(&self, y: f32) {
        self.log.borrow_mut().scroll_y = y;
    }
}

impl ScrollController for FakeScroll {
    fn suspend(&mut self) {
        let mut log = self.log.borrow_mut();
        log.suspended = true;
        log.suspend_calls += 1;
    }

    fn resume(&mut self) {
        let mut log = self.log.borrow_mut();
        log.suspended = false;
        log.resume_calls += 1;
    }

    fn scroll_to(&mut self, y: f32, _immediate: bool) {
        let mut log = self.log.borrow_mut();
        log.scroll_y = y;
        log.jumps.push(y);
    }

    fn scroll_y(&self) -> f32 {
        self.log.borrow().scroll_y
    }
}

#[derive(Debug, Default)]
struct RouterLog {
    pushes: Vec<String>,
    fail: bool,
}

/// Records route pushes; can be told to fail them.
#[derive(Debug, Clone, Default)]
pub struct FakeRouter {
    log: Rc<RefCell<RouterLog>>,
}

impl FakeRouter {
    /// Every pushed href, in order.
    #[must_use]
    pub fn pushes(&self) -> Vec<String> {
        self.log.borrow().pushes.clone()
    }

    /// Make subsequent pushes fail.
    pub fn set_failing(&self, fail: bool) {
        self.log.borrow_mut().fail = fail;
    }
}

impl Router for FakeRouter {
    fn push(&mut self, href: &str) -> Result<(), SegueError> {
        let mut log = self.log.borrow_mut();
        if log.fail {
            return Err(SegueError::Navigation(format!(
                "navigation to {href} cancelled"
            )));
        }
        log.pushes.push(href.to_owned());
        Ok(())
    }
}

#[derive(Debug)]
struct HistoryLog {
    entries: Vec<String>,
    cursor: usize,
    pushes: usize,
}

/// Session history with a cursor, like `window.history`.
#[derive(Debug, Clone)]
pub struct FakeHistory {
    log: Rc<RefCell<HistoryLog>>,
}

impl FakeHistory {
    /// History holding a single entry for `url`.
    #[must_use]
    pub fn starting_at(url: &str) -> Self {
        Self {
            log: Rc::new(RefCell::new(HistoryLog {
                entries: vec![url.to_owned()],
                cursor: 0,
                pushes: 0,
            })),
        }
    }

    /// `history.length`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().entries.len()
    }

    /// Whether history is empty (never true for a started history).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().entries.is_empty()
    }

    /// URL of the current entry.
    #[must_use]
    pub fn current(&self) -> String {
        let log = self.log.borrow();
        log.entries.get(log.cursor).cloned().unwrap_or_default()
    }

    /// Number of `push_state` calls so far.
    #[must_use]
    pub fn push_count(&self) -> usize {
        self.log.borrow().pushes
    }

    /// Browser back button. Returns the URL now current, or `None` at the
    /// start of history. The caller delivers the `popstate`.
    pub fn back(&self) -> Option<String> {
        let mut log = self.log.borrow_mut();
        if log.cursor == 0 {
            return None;
        }
        log.cursor -= 1;
        log.entries.get(log.cursor).cloned()
    }
}

impl Default for FakeHistory {
    fn default() -> Self {
        Self::starting_at("/")
    }
}

impl HistoryPort for FakeHistory {
    fn push_state(&mut self, url: &str) {
        let mut log = self.log.borrow_mut();
        let keep = log.cursor + 1;
        log.entries.truncate(keep);
        log.entries.push(url.to_owned());
        log.cursor = log.entries.len() - 1;
        log.pushes += 1;
    }
}

#[derive(Debug)]
struct ChromeLog {
    nav_opacity: f32,
    body_locked: bool,
}

/// Tracks navigation opacity and body overflow.
#[derive(Debug, Clone)]
pub struct FakeChrome {
    log: Rc<RefCell<ChromeLog>>,
}

impl FakeChrome {
    /// Current navigation opacity.
    #[must_use]
    pub fn nav_opacity(&self) -> f32 {
        self.log.borrow().nav_opacity
    }

    /// Whether document scrolling is disabled.
    #[must_use]
    pub fn body_locked(&self) -> bool {
        self.log.borrow().body_locked
    }
}

impl Default for FakeChrome {
    fn default() -> Self {
        Self {
            log: Rc::new(RefCell::new(ChromeLog {
                nav_opacity: 1.0,
                body_locked: false,
            })),
        }
    }
}

impl PageChrome for FakeChrome {
    fn set_nav_opacity(&mut self, opacity: f32) {
        self.log.borrow_mut().nav_opacity = opacity;
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        self.log.borrow_mut().body_locked = locked;
    }
}

#[derive(Debug)]
struct Layout {
    viewport: Viewport,
    thumbnails: FxHashMap<String, Rect>,
}

/// A page layout whose thumbnails can be moved or unmounted.
#[derive(Debug, Clone)]
pub struct FakeRects {
    layout: Rc<RefCell<Layout>>,
}

impl FakeRects {
    /// Empty layout in a viewport of the given size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            layout: Rc::new(RefCell::new(Layout {
                viewport,
                thumbnails: FxHashMap::default(),
            })),
        }
    }

    /// Mount (or move) the thumbnail for `slug`.
    pub fn place(&self, slug: &str, rect: Rect) {
        let _ = self
            .layout
            .borrow_mut()
            .thumbnails
            .insert(slug.to_owned(), rect);
    }

    /// Unmount the thumbnail for `slug`.
    pub fn remove(&self, slug: &str) {
        let _ = self.layout.borrow_mut().thumbnails.remove(slug);
    }

    /// Resize the viewport.
    pub fn resize(&self, viewport: Viewport) {
        self.layout.borrow_mut().viewport = viewport;
    }
}

impl Default for FakeRects {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl RectProvider for FakeRects {
    fn thumbnail_rect(&self, slug: &str) -> Option<Rect> {
        self.layout.borrow().thumbnails.get(slug).copied()
    }

    fn viewport(&self) -> Viewport {
        self.layout.borrow().viewport
    }
}
