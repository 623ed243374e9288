//! Split-reveal: two panels close over the page, the route changes while
//! the screen is covered, then the panels part to reveal the new page.
//!
//! Phase machine: `Idle → Exiting → Covering → Splitting → Complete →
//! Idle`. `Exiting` is ended by the consumer once its own exit visuals
//! finish; every later phase is advanced here from tween completion, so
//! the panel animation and the phase change always share one duration.
//!
//! While the new route mounts, the document is pinned to the top on a
//! short interval to defeat scroll restoration by the router or browser.

use serde::Serialize;
use web_time::{Duration, Instant};

use crate::animation::{Interval, Tween};
use crate::error::SegueError;
use crate::geometry::{Rect, Viewport};
use crate::host::{PageChrome, Router};
use crate::options::SplitOptions;
use crate::outcome::{IgnoreReason, Outcome};
use crate::scroll::{ScrollArbiter, ScrollHolder, ScrollLock};
use crate::shared_element::Direction;

/// Split-reveal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPhase {
    /// No transition.
    #[default]
    Idle,
    /// The current page plays its own exit animation.
    Exiting,
    /// Panels close in; the route is pushed once they meet.
    Covering,
    /// Panels part to reveal the new page.
    Splitting,
    /// Reveal finished; cleanup pending.
    Complete,
}

/// A click on a split-reveal trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRequest {
    /// Row, in viewport pixels, where the two panels meet.
    pub split_y: f32,
    /// Route pushed while the screen is covered.
    pub target_route: String,
    /// Label shown on the cover.
    pub target_category: String,
    /// Page scroll offset at click time.
    pub scroll_position: f32,
    /// Navigation direction.
    pub direction: Direction,
}

impl SplitRequest {
    /// Forward request seamed at the vertical center of the clicked
    /// element.
    #[must_use]
    pub fn from_click(
        clicked: &Rect,
        target_route: &str,
        target_category: &str,
        scroll_position: f32,
    ) -> Self {
        Self {
            split_y: clicked.center_y(),
            target_route: target_route.to_owned(),
            target_category: target_category.to_owned(),
            scroll_position,
            direction: Direction::Forward,
        }
    }
}

/// Observable split-reveal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitTransitionState {
    /// Current phase.
    pub phase: SplitPhase,
    /// Seam row, clamped to the viewport captured at start.
    pub split_y: f32,
    /// Route pushed while covered.
    pub target_route: String,
    /// Label shown on the cover.
    pub target_category: String,
    /// Page scroll offset at click time.
    pub scroll_position: f32,
    /// Navigation direction.
    pub direction: Direction,
    /// Viewport measured at start. Panels are not re-measured on resize.
    pub viewport: Viewport,
}

/// One cover panel. `offset_y` is the translation applied to a panel
/// laid out at `top` with the given `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelFrame {
    /// Layout top edge.
    pub top: f32,
    /// Layout height.
    pub height: f32,
    /// Vertical translation.
    pub offset_y: f32,
}

impl PanelFrame {
    /// Rows `(from, to)` the panel occupies after translation.
    #[must_use]
    pub fn span(&self) -> (f32, f32) {
        let top = self.top + self.offset_y;
        (top, top + self.height)
    }
}

/// What the split overlay renders this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPanels {
    /// Phase driving the panels.
    pub phase: SplitPhase,
    /// Panel covering `[0, split_y]` when closed.
    pub top: PanelFrame,
    /// Panel covering `[split_y, viewport.height]` when closed.
    pub bottom: PanelFrame,
    /// Label shown on the cover.
    pub category: String,
}

struct Active {
    state: SplitTransitionState,
    covering_started: Option<Instant>,
    cover: Option<Tween>,
    split: Option<Tween>,
    pushed: bool,
    pin: Option<Interval>,
    settle_at: Option<Instant>,
    lock: Option<ScrollLock>,
}

/// Drives the split-reveal phase machine.
pub struct SplitRevealCoordinator {
    options: SplitOptions,
    active: Option<Active>,
}

impl SplitRevealCoordinator {
    /// Idle coordinator.
    #[must_use]
    pub fn new(options: SplitOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SplitPhase {
        self.active
            .as_ref()
            .map_or(SplitPhase::Idle, |a| a.state.phase)
    }

    /// Whether a split transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// Snapshot of the transition, `None` when idle.
    #[must_use]
    pub fn state(&self) -> Option<&SplitTransitionState> {
        self.active.as_ref().map(|a| &a.state)
    }

    /// `Idle → Exiting`. Rejected unless idle.
    pub fn start(&mut self, request: SplitRequest, viewport: Viewport) -> Outcome {
        if self.active.is_some() {
            return Outcome::Ignored(IgnoreReason::SplitPhase);
        }

        log::debug!(
            "split reveal to {} at y={}",
            request.target_route,
            request.split_y
        );
        self.active = Some(Active {
            state: SplitTransitionState {
                phase: SplitPhase::Exiting,
                split_y: request.split_y.clamp(0.0, viewport.height),
                target_route: request.target_route,
                target_category: request.target_category,
                scroll_position: request.scroll_position,
                direction: request.direction,
                viewport,
            },
            covering_started: None,
            cover: None,
            split: None,
            pushed: false,
            pin: None,
            settle_at: None,
            lock: None,
        });
        Outcome::Accepted
    }

    /// Consumer-driven phase change. Only `Exiting → Covering` is driven
    /// from outside; repeating the current phase is a no-op.
    pub fn set_phase(
        &mut self,
        to: SplitPhase,
        now: Instant,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) -> Result<(), SegueError> {
        let from = self.phase();
        if from == to {
            return Ok(());
        }
        let Some(active) = self.active.as_mut() else {
            return Err(SegueError::IllegalPhase { from, to });
        };
        if from != SplitPhase::Exiting || to != SplitPhase::Covering {
            return Err(SegueError::IllegalPhase { from, to });
        }

        active.state.phase = SplitPhase::Covering;
        active.covering_started = Some(now);
        active.cover = Some(Tween::new(now, self.options.cover));
        active.lock = Some(scroll.acquire(ScrollHolder::SplitReveal));
        chrome.set_nav_opacity(0.0);
        chrome.set_body_scroll_locked(true);
        Ok(())
    }

    /// Advance timed phases. A late tick walks through every phase whose
    /// deadline has passed.
    pub fn tick(
        &mut self,
        now: Instant,
        router: &mut dyn Router,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) {
        loop {
            let before = self.phase();
            self.step(now, router, scroll, chrome);
            if self.phase() == before {
                break;
            }
        }
    }

    fn step(
        &mut self,
        now: Instant,
        router: &mut dyn Router,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) {
        let reveal_at = Duration::from_millis(self.options.reveal_at_ms());
        let pin_period =
            Duration::from_millis(self.options.scroll_pin_interval_ms);
        let settle = Duration::from_millis(self.options.settle_ms);
        let split_motion = self.options.split;

        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Some(pin) = active.pin.as_mut() {
            if pin.poll(now) {
                scroll.scroll_to(0.0, true);
            }
        }

        match active.state.phase {
            SplitPhase::Idle | SplitPhase::Exiting => {}
            SplitPhase::Covering => {
                let covered = active.cover.is_some_and(|t| t.is_complete(now));
                if covered && !active.pushed {
                    active.pushed = true;
                    active.pin = Some(Interval::starting(now, pin_period));
                    scroll.scroll_to(0.0, true);
                    if let Err(e) = router.push(&active.state.target_route) {
                        log::warn!(
                            "split reveal to {} not navigated: {e}",
                            active.state.target_route
                        );
                    }
                }
                let Some(started) = active.covering_started else {
                    return;
                };
                if active.pushed && now >= started + reveal_at {
                    active.state.phase = SplitPhase::Splitting;
                    active.split =
                        Some(Tween::new(started + reveal_at, split_motion));
                    scroll.scroll_to(0.0, true);
                }
            }
            SplitPhase::Splitting => {
                if active.split.is_some_and(|t| t.is_complete(now)) {
                    active.state.phase = SplitPhase::Complete;
                    active.pin = None;
                    let ended = active.split.map_or(now, |t| t.end());
                    active.settle_at = Some(ended + settle);
                    scroll.scroll_to(0.0, true);
                    chrome.set_nav_opacity(1.0);
                }
            }
            SplitPhase::Complete => {
                if active.settle_at.is_some_and(|at| now >= at) {
                    log::debug!(
                        "split reveal to {} settled",
                        active.state.target_route
                    );
                    chrome.set_body_scroll_locked(false);
                    // Dropping the state releases the scroll lock.
                    self.active = None;
                }
            }
        }
    }

    /// The route changed underneath the transition. A split still in
    /// `Exiting` was abandoned by the page that started it and is torn
    /// down; later phases own the route change and carry on.
    pub fn route_changed(&mut self, chrome: &mut dyn PageChrome) {
        if self.phase() == SplitPhase::Exiting {
            log::debug!("split reveal abandoned before covering");
            self.abort(chrome);
        }
    }

    /// Tear down an in-flight transition, restoring chrome and scrolling.
    pub fn abort(&mut self, chrome: &mut dyn PageChrome) {
        if let Some(active) = self.active.take() {
            if active.lock.is_some() {
                chrome.set_nav_opacity(1.0);
                chrome.set_body_scroll_locked(false);
            }
        }
    }

    /// Panel geometry at `now`, `None` unless covering or splitting.
    #[must_use]
    pub fn panels(&self, now: Instant) -> Option<SplitPanels> {
        let active = self.active.as_ref()?;
        let state = &active.state;
        let vh = state.viewport.height;
        let y = state.split_y;
        let overshoot = self.options.panel_overshoot;
        let top_away = -(y + overshoot);
        let bottom_away = vh - y + overshoot;

        // 0.0 = panels off-screen, 1.0 = panels meeting at the seam.
        let closed = match state.phase {
            SplitPhase::Covering => active.cover.map_or(0.0, |t| t.eased(now)),
            SplitPhase::Splitting => {
                1.0 - active.split.map_or(1.0, |t| t.eased(now))
            }
            SplitPhase::Idle | SplitPhase::Exiting | SplitPhase::Complete => {
                return None;
            }
        };

        Some(SplitPanels {
            phase: state.phase,
            top: PanelFrame {
                top: 0.0,
                height: y,
                offset_y: top_away * (1.0 - closed),
            },
            bottom: PanelFrame {
                top: y,
                height: vh - y,
                offset_y: bottom_away * (1.0 - closed),
            },
            category: state.target_category.clone(),
        })
    }
}

impl std::fmt::Debug for SplitRevealCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitRevealCoordinator")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{FakeChrome, FakeRouter, FakeScroll};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Rig {
        split: SplitRevealCoordinator,
        arbiter: ScrollArbiter,
        scroll: FakeScroll,
        router: FakeRouter,
        chrome: FakeChrome,
    }

    impl Rig {
        fn new() -> Self {
            let scroll = FakeScroll::default();
            Self {
                split: SplitRevealCoordinator::new(SplitOptions::default()),
                arbiter: ScrollArbiter::new(scroll.clone()),
                scroll,
                router: FakeRouter::default(),
                chrome: FakeChrome::default(),
            }
        }

        fn tick(&mut self, now: Instant) {
            let mut router = self.router.clone();
            let mut chrome = self.chrome.clone();
            self.split.tick(now, &mut router, &self.arbiter, &mut chrome);
        }

        fn cover(&mut self, now: Instant) {
            let mut chrome = self.chrome.clone();
            self.split
                .set_phase(SplitPhase::Covering, now, &self.arbiter, &mut chrome)
                .unwrap();
        }
    }

    fn request(split_y: f32) -> SplitRequest {
        SplitRequest {
            split_y,
            target_route: "/portfolio/weddings".to_owned(),
            target_category: "Weddings".to_owned(),
            scroll_position: 0.0,
            direction: Direction::Forward,
        }
    }

    #[test]
    fn full_sequence() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let vp = Viewport::new(1200.0, 1000.0);

        assert!(rig.split.start(request(400.0), vp).is_accepted());
        assert_eq!(rig.split.phase(), SplitPhase::Exiting);
        assert!(rig.split.panels(t0).is_none());

        rig.cover(t0);
        assert_eq!(rig.split.phase(), SplitPhase::Covering);
        assert!(rig.scroll.is_suspended());
        assert_eq!(rig.chrome.nav_opacity(), 0.0);
        assert!(rig.chrome.body_locked());

        rig.tick(t0 + ms(399));
        assert!(rig.router.pushes().is_empty(), "no push before covered");

        rig.tick(t0 + ms(400));
        assert_eq!(rig.router.pushes(), vec!["/portfolio/weddings".to_owned()]);
        let panels = rig.split.panels(t0 + ms(400)).unwrap();
        assert_eq!(panels.top.span(), (0.0, 400.0));
        assert_eq!(panels.bottom.span(), (400.0, 1000.0));

        rig.tick(t0 + ms(1599));
        assert_eq!(rig.split.phase(), SplitPhase::Covering);

        rig.tick(t0 + ms(1600));
        assert_eq!(rig.split.phase(), SplitPhase::Splitting);

        rig.tick(t0 + ms(2600));
        assert_eq!(rig.split.phase(), SplitPhase::Complete);
        assert_eq!(rig.chrome.nav_opacity(), 1.0);
        assert!(rig.scroll.is_suspended(), "held until settled");

        rig.tick(t0 + ms(2700));
        assert_eq!(rig.split.phase(), SplitPhase::Idle);
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.chrome.body_locked());
        assert_eq!(rig.router.pushes().len(), 1);
    }

    #[test]
    fn scroll_is_pinned_while_route_mounts() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.split.start(request(300.0), Viewport::new(800.0, 900.0));
        rig.cover(t0);

        rig.tick(t0 + ms(400));
        let after_push = rig.scroll.jumps().len();
        assert_eq!(after_push, 1, "pinned at push time");

        let mut t = 400;
        while t < 1600 {
            t += 30;
            rig.tick(t0 + ms(t));
        }
        assert!(rig.scroll.jumps().len() > after_push + 30);
        assert!(rig.scroll.jumps().iter().all(|&y| y == 0.0));

        // Pinning stops once the reveal has finished.
        rig.tick(t0 + ms(2600));
        let at_complete = rig.scroll.jumps().len();
        rig.tick(t0 + ms(2630));
        rig.tick(t0 + ms(2660));
        assert_eq!(rig.scroll.jumps().len(), at_complete);
    }

    #[test]
    fn late_tick_walks_every_phase() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.split.start(request(400.0), Viewport::new(1200.0, 1000.0));
        rig.cover(t0);
        rig.tick(t0 + ms(10_000));
        assert_eq!(rig.router.pushes().len(), 1);
        assert_eq!(rig.split.phase(), SplitPhase::Idle);
        assert_eq!(rig.chrome.nav_opacity(), 1.0);
        assert!(!rig.scroll.is_suspended());
    }

    #[test]
    fn second_start_is_rejected() {
        let mut rig = Rig::new();
        let vp = Viewport::new(1200.0, 1000.0);
        let _ = rig.split.start(request(400.0), vp);
        assert_eq!(
            rig.split.start(request(100.0), vp),
            Outcome::Ignored(IgnoreReason::SplitPhase)
        );
        assert_eq!(rig.split.state().unwrap().split_y, 400.0);
    }

    #[test]
    fn illegal_phase_changes_are_errors() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let mut chrome = rig.chrome.clone();
        let err = rig
            .split
            .set_phase(SplitPhase::Covering, t0, &rig.arbiter, &mut chrome)
            .unwrap_err();
        assert!(matches!(
            err,
            SegueError::IllegalPhase {
                from: SplitPhase::Idle,
                to: SplitPhase::Covering
            }
        ));

        let _ = rig.split.start(request(400.0), Viewport::new(1200.0, 1000.0));
        assert!(rig
            .split
            .set_phase(SplitPhase::Splitting, t0, &rig.arbiter, &mut chrome)
            .is_err());
        assert!(rig
            .split
            .set_phase(SplitPhase::Exiting, t0, &rig.arbiter, &mut chrome)
            .is_ok());
    }

    #[test]
    fn panels_travel_off_screen() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.split.start(request(400.0), Viewport::new(1200.0, 1000.0));
        rig.cover(t0);

        let start = rig.split.panels(t0).unwrap();
        assert_eq!(start.top.span(), (-450.0, -50.0));
        assert_eq!(start.bottom.span(), (1050.0, 1650.0));

        rig.tick(t0 + ms(400));
        rig.tick(t0 + ms(1600));
        rig.tick(t0 + ms(2599));
        let nearly = rig.split.panels(t0 + ms(2599)).unwrap();
        assert!(nearly.top.span().1 < 0.0);
        assert!(nearly.bottom.span().0 > 1000.0);
    }

    #[test]
    fn split_y_is_clamped_to_viewport() {
        let mut rig = Rig::new();
        let _ = rig.split.start(request(5000.0), Viewport::new(800.0, 600.0));
        assert_eq!(rig.split.state().unwrap().split_y, 600.0);
    }

    #[test]
    fn abort_restores_everything() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.split.start(request(400.0), Viewport::new(1200.0, 1000.0));
        rig.cover(t0);
        let mut chrome = rig.chrome.clone();
        rig.split.abort(&mut chrome);
        assert!(!rig.split.is_transitioning());
        assert!(!rig.scroll.is_suspended());
        assert_eq!(rig.chrome.nav_opacity(), 1.0);
        assert!(!rig.chrome.body_locked());
    }

    #[test]
    fn route_change_releases_only_an_abandoned_exit() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let vp = Viewport::new(1200.0, 1000.0);
        let mut chrome = rig.chrome.clone();

        let _ = rig.split.start(request(400.0), vp);
        rig.split.route_changed(&mut chrome);
        assert_eq!(rig.split.phase(), SplitPhase::Idle);

        let _ = rig.split.start(request(400.0), vp);
        rig.cover(t0);
        rig.split.route_changed(&mut chrome);
        assert_eq!(rig.split.phase(), SplitPhase::Covering);
    }

    #[test]
    fn from_click_uses_vertical_center() {
        let req = SplitRequest::from_click(
            &Rect::new(350.0, 0.0, 1200.0, 100.0),
            "/portfolio/portrait",
            "Portrait",
            120.0,
        );
        assert_eq!(req.split_y, 400.0);
        assert_eq!(req.direction, Direction::Forward);
    }
}
