//! Uniform page exit: play an exit animation, then change route.
//!
//! `navigate_to` marks the page as exiting and suspends scrolling. When
//! the exit tween completes the route is pushed. The exiting state is
//! cleared only when the route observer reports a different pathname, so
//! a slow navigation never flashes the old page back in.

use web_time::{Duration, Instant};

use crate::animation::{stagger, Tween};
use crate::host::Router;
use crate::options::PageExitOptions;
use crate::outcome::{IgnoreReason, Outcome};
use crate::scroll::{ScrollArbiter, ScrollHolder, ScrollLock};

/// Observable page-exit state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageExitState {
    /// Whether pages should play their exit variants.
    pub is_exiting: bool,
    /// Destination of the in-flight exit.
    pub href: Option<String>,
}

struct ActiveExit {
    href: String,
    started: Instant,
    tween: Tween,
    pushed: bool,
    _lock: ScrollLock,
}

/// Coordinates exits for plain navigation links.
pub struct PageExitCoordinator {
    options: PageExitOptions,
    active: Option<ActiveExit>,
}

impl PageExitCoordinator {
    /// Idle coordinator.
    #[must_use]
    pub fn new(options: PageExitOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    /// Begin exiting toward `href`.
    ///
    /// No-op while an exit is in flight or when `href` is the current
    /// route.
    pub fn navigate_to(
        &mut self,
        href: &str,
        current_route: &str,
        now: Instant,
        scroll: &ScrollArbiter,
    ) -> Outcome {
        if self.active.is_some() {
            return Outcome::Ignored(IgnoreReason::AlreadyExiting);
        }
        if href == current_route {
            return Outcome::Ignored(IgnoreReason::SameRoute);
        }

        log::debug!("page exit: {current_route} -> {href}");
        self.active = Some(ActiveExit {
            href: href.to_owned(),
            started: now,
            tween: Tween::new(now, self.options.exit),
            pushed: false,
            _lock: scroll.acquire(ScrollHolder::PageExit),
        });
        Outcome::Accepted
    }

    /// Push the route once the exit animation has played.
    pub fn tick(&mut self, now: Instant, router: &mut dyn Router) {
        let Some(exit) = self.active.as_mut() else {
            return;
        };

        if !exit.pushed && exit.tween.is_complete(now) {
            exit.pushed = true;
            if let Err(e) = router.push(&exit.href) {
                // Stays exiting until the route observer fires.
                log::warn!("page exit to {} not navigated: {e}", exit.href);
            }
        }

        if let Some(limit) = self.options.watchdog_ms {
            if now.saturating_duration_since(exit.started)
                >= Duration::from_millis(limit)
            {
                log::warn!(
                    "page exit to {} abandoned after {limit}ms",
                    exit.href
                );
                self.active = None;
            }
        }
    }

    /// Route observer. Clears the exit when the pathname moved away from
    /// the one the exit started on. Returns whether an exit was cleared.
    pub fn route_changed(&mut self, previous: &str, current: &str) -> bool {
        if previous == current || self.active.is_none() {
            return false;
        }
        log::debug!("page exit complete at {current}");
        self.active = None;
        true
    }

    /// Drop any in-flight exit, releasing its scroll lock.
    pub fn abort(&mut self) {
        self.active = None;
    }

    /// Whether pages should play their exit variants.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.active.is_some()
    }

    /// Snapshot of the exit state.
    #[must_use]
    pub fn state(&self) -> PageExitState {
        PageExitState {
            is_exiting: self.active.is_some(),
            href: self.active.as_ref().map(|e| e.href.clone()),
        }
    }

    /// Eased exit progress, for consumers that drive their exit visuals
    /// from the same tween that gates the navigation.
    #[must_use]
    pub fn progress(&self, now: Instant) -> Option<f32> {
        self.active.as_ref().map(|e| e.tween.eased(now))
    }

    /// Start delay of the `index`-th element in a staggered exit.
    #[must_use]
    pub fn exit_delay(&self, index: usize, base: Duration) -> Duration {
        stagger(
            base,
            Duration::from_millis(self.options.stagger_step_ms),
            index,
        )
    }
}

impl std::fmt::Debug for PageExitCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageExitCoordinator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
