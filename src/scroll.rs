//! Arbitration of the page's smooth-scroll engine.
//!
//! Every coordinator that needs a fixed viewport takes a [`ScrollLock`]
//! from the shared [`ScrollArbiter`]. The engine is suspended when the
//! first lock is taken and resumed only when the last one is dropped,
//! whichever path drops it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// The injected smooth-scroll engine.
pub trait ScrollController {
    /// Stop reacting to user scroll input.
    fn suspend(&mut self);
    /// Resume reacting to user scroll input.
    fn resume(&mut self);
    /// Jump (or glide, when `immediate` is false) to a document offset.
    /// Must work while suspended.
    fn scroll_to(&mut self, y: f32, immediate: bool);
    /// Current document scroll offset.
    fn scroll_y(&self) -> f32;
}

/// Which coordinator holds a scroll lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScrollHolder {
    /// Page exit, from `navigate_to` until the route change is observed.
    PageExit,
    /// Split-reveal, from covering until the state clears.
    SplitReveal,
    /// Detail-route morph, while the hero image is in flight.
    DetailReveal,
    /// In-page modal, from expanding until closed.
    Modal,
}

struct ArbiterState {
    controller: Box<dyn ScrollController>,
    holders: FxHashMap<ScrollHolder, usize>,
    total: usize,
}

impl ArbiterState {
    fn release(&mut self, holder: ScrollHolder) {
        let Some(count) = self.holders.get_mut(&holder) else {
            log::warn!("scroll lock released by non-holder {holder:?}");
            return;
        };
        *count -= 1;
        if *count == 0 {
            let _ = self.holders.remove(&holder);
        }
        self.total -= 1;
        if self.total == 0 {
            log::debug!("scroll resumed ({holder:?} released last lock)");
            self.controller.resume();
        }
    }
}

/// Shared, reference-counted owner of the scroll engine.
///
/// Cloning yields another handle to the same engine.
#[derive(Clone)]
pub struct ScrollArbiter {
    state: Rc<RefCell<ArbiterState>>,
}

impl ScrollArbiter {
    /// Wrap the page's scroll engine.
    pub fn new(controller: impl ScrollController + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(ArbiterState {
                controller: Box::new(controller),
                holders: FxHashMap::default(),
                total: 0,
            })),
        }
    }

    /// Take a lock for `holder`, suspending the engine if it was running.
    #[must_use = "the scroll engine resumes as soon as the lock is dropped"]
    pub fn acquire(&self, holder: ScrollHolder) -> ScrollLock {
        let mut state = self.state.borrow_mut();
        if state.total == 0 {
            log::debug!("scroll suspended by {holder:?}");
            state.controller.suspend();
        }
        *state.holders.entry(holder).or_insert(0) += 1;
        state.total += 1;
        ScrollLock {
            state: Rc::clone(&self.state),
            holder,
        }
    }

    /// Whether any lock is outstanding.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.state.borrow().total > 0
    }

    /// Number of outstanding locks.
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.state.borrow().total
    }

    /// Distinct holders with outstanding locks, in declaration order.
    #[must_use]
    pub fn holders(&self) -> Vec<ScrollHolder> {
        let mut holders: Vec<_> =
            self.state.borrow().holders.keys().copied().collect();
        holders.sort_unstable();
        holders
    }

    /// Forward a scroll jump to the engine. Allowed while suspended.
    pub fn scroll_to(&self, y: f32, immediate: bool) {
        self.state.borrow_mut().controller.scroll_to(y, immediate);
    }

    /// Current document scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f32 {
        self.state.borrow().controller.scroll_y()
    }
}

impl fmt::Debug for ScrollArbiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollArbiter")
            .field("holders", &self.holders())
            .field("lock_count", &self.lock_count())
            .finish_non_exhaustive()
    }
}

/// Scoped hold on the scroll engine. Released on drop.
pub struct ScrollLock {
    state: Rc<RefCell<ArbiterState>>,
    holder: ScrollHolder,
}

impl ScrollLock {
    /// Coordinator holding this lock.
    #[must_use]
    pub fn holder(&self) -> ScrollHolder {
        self.holder
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.release(self.holder),
            Err(_) => {
                log::error!(
                    "scroll lock for {:?} dropped while arbiter borrowed",
                    self.holder
                );
            }
        }
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("holder", &self.holder)
            .finish_non_exhaustive()
    }
}
