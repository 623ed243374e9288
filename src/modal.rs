//! In-page project modal with a shared-element morph.
//!
//! `Closed → Expanding → Open → Closing → Closed`. Expanding and closing
//! end when the morph completes, either because the tween reached its
//! end on a tick or because the host reported the animation finished.
//!
//! The open state is mirrored into `?project=<slug>`: opening pushes a
//! history entry and closing pushes the bare pathname, except when the
//! close was triggered by the browser's back button, which has already
//! moved history.

use serde::Serialize;
use web_time::{Duration, Instant};

use crate::animation::{RectTween, Tween};
use crate::geometry::Rect;
use crate::history::{project_param, project_url};
use crate::host::{HistoryPort, PageChrome, RectProvider};
use crate::options::RevealOptions;
use crate::outcome::{IgnoreReason, Outcome};
use crate::scroll::{ScrollArbiter, ScrollHolder, ScrollLock};
use crate::shared_element::ContentReveal;

/// Modal animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalPhase {
    /// Nothing shown.
    #[default]
    Closed,
    /// Image morphing from thumbnail to hero.
    Expanding,
    /// Image at hero position, content shown.
    Open,
    /// Image morphing back onto the thumbnail.
    Closing,
}

/// Observable modal state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModalState {
    /// Slug of the shown item.
    pub selected: Option<String>,
    /// Rendered image rectangle.
    pub image_rect: Option<Rect>,
    /// Whether the modal is expanding or open.
    pub is_open: bool,
    /// Whether the closing morph is pending or running.
    pub is_closing: bool,
    /// Animation phase.
    pub phase: ModalPhase,
    /// Whether modal content (title, text, gallery) is shown.
    pub content_visible: bool,
}

struct Session {
    slug: String,
    pathname: String,
    saved: Option<Rect>,
    hero: Rect,
    phase: ModalPhase,
    morph: RectTween,
    content: Option<ContentReveal>,
    from_pop: bool,
    _lock: ScrollLock,
}

/// Drives the project modal.
pub struct ModalCoordinator {
    options: RevealOptions,
    session: Option<Session>,
}

impl ModalCoordinator {
    /// Closed modal.
    #[must_use]
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.session.as_ref().map_or(ModalPhase::Closed, |s| s.phase)
    }

    /// Whether the modal is anything but closed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Slug of the shown item.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.slug.as_str())
    }

    /// Open the modal for `slug` from its thumbnail on `pathname`.
    ///
    /// Ignored unless closed, and when the thumbnail cannot be measured.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &mut self,
        slug: &str,
        pathname: &str,
        now: Instant,
        rects: &dyn RectProvider,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
        history: &mut dyn HistoryPort,
    ) -> Outcome {
        if self.session.is_some() {
            return Outcome::Ignored(IgnoreReason::ModalPhase);
        }
        let Some(rect) = rects.thumbnail_rect(slug) else {
            log::debug!("modal for {slug} not opened, thumbnail not mounted");
            return Outcome::Ignored(IgnoreReason::NoThumbnail);
        };

        history.push_state(&project_url(pathname, slug));
        self.begin(slug, pathname, Some(rect), now, rects, scroll, chrome);
        Outcome::Accepted
    }

    /// Reopen the modal named by `?project=<slug>` in `query` without
    /// writing history. Without a mounted thumbnail the modal opens
    /// directly in its final state.
    pub fn open_from_url(
        &mut self,
        query: &str,
        pathname: &str,
        now: Instant,
        rects: &dyn RectProvider,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) -> Outcome {
        let Some(slug) = project_param(query) else {
            return Outcome::Ignored(IgnoreReason::NoRequest);
        };
        if self.session.is_some() {
            return Outcome::Ignored(IgnoreReason::ModalPhase);
        }

        let rect = rects.thumbnail_rect(slug);
        self.begin(slug, pathname, rect, now, rects, scroll, chrome);
        if rect.is_none() {
            let _ = self.finish_expand(now);
        }
        Outcome::Accepted
    }

    #[allow(clippy::too_many_arguments)]
    fn begin(
        &mut self,
        slug: &str,
        pathname: &str,
        from: Option<Rect>,
        now: Instant,
        rects: &dyn RectProvider,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) {
        let hero = rects.viewport().hero_rect(self.options.hero_fraction);
        chrome.set_body_scroll_locked(true);
        log::debug!("modal {slug} expanding from {from:?}");
        self.session = Some(Session {
            slug: slug.to_owned(),
            pathname: pathname.to_owned(),
            saved: from,
            hero,
            phase: ModalPhase::Expanding,
            morph: RectTween::new(
                from.unwrap_or(hero),
                hero,
                Tween::new(now, self.options.morph),
            ),
            content: None,
            from_pop: false,
            _lock: scroll.acquire(ScrollHolder::Modal),
        });
    }

    fn finish_expand(&mut self, now: Instant) -> Outcome {
        let delay = Duration::from_millis(self.options.content_delay_ms);
        let content = ContentReveal::at(now + delay, &self.options);
        let Some(session) = self.session.as_mut() else {
            return Outcome::Ignored(IgnoreReason::NotAnimating);
        };
        session.phase = ModalPhase::Open;
        session.content = Some(content);
        Outcome::Accepted
    }

    /// Close from `Expanding` or `Open`.
    pub fn close(&mut self, now: Instant, rects: &dyn RectProvider) -> Outcome {
        self.begin_close(now, rects, false)
    }

    /// Browser back button. Closes the modal without writing history
    /// when it is expanding or open; otherwise not handled and the
    /// router should navigate.
    pub fn pop_state(
        &mut self,
        now: Instant,
        rects: &dyn RectProvider,
    ) -> Outcome {
        self.begin_close(now, rects, true)
    }

    fn begin_close(
        &mut self,
        now: Instant,
        rects: &dyn RectProvider,
        from_pop: bool,
    ) -> Outcome {
        let fade = Duration::from_millis(self.options.close_fade_ms);
        let motion = self.options.morph;
        let Some(session) = self.session.as_mut() else {
            return Outcome::Ignored(IgnoreReason::ModalPhase);
        };
        if !matches!(session.phase, ModalPhase::Expanding | ModalPhase::Open) {
            return Outcome::Ignored(IgnoreReason::ModalPhase);
        }

        // The page may have scrolled or re-rendered since opening.
        let target = rects
            .thumbnail_rect(&session.slug)
            .or(session.saved)
            .unwrap_or(session.hero);
        let current = session.morph.sample(now);
        log::debug!("modal {} closing onto {target:?}", session.slug);

        session.phase = ModalPhase::Closing;
        session.content = None;
        session.from_pop = from_pop;
        session.morph =
            RectTween::new(current, target, Tween::delayed(now, fade, motion));
        Outcome::Accepted
    }

    /// The host reports that the running morph finished.
    pub fn animation_complete(
        &mut self,
        now: Instant,
        chrome: &mut dyn PageChrome,
        history: &mut dyn HistoryPort,
    ) -> Outcome {
        match self.phase() {
            ModalPhase::Expanding => self.finish_expand(now),
            ModalPhase::Closing => {
                self.finish_close(chrome, history);
                Outcome::Accepted
            }
            ModalPhase::Open | ModalPhase::Closed => {
                Outcome::Ignored(IgnoreReason::NotAnimating)
            }
        }
    }

    fn finish_close(
        &mut self,
        chrome: &mut dyn PageChrome,
        history: &mut dyn HistoryPort,
    ) {
        let Some(session) = self.session.take() else {
            return;
        };
        chrome.set_body_scroll_locked(false);
        if !session.from_pop {
            history.push_state(&session.pathname);
        }
        log::debug!("modal {} closed", session.slug);
    }

    /// Complete morphs whose tween has ended.
    pub fn tick(
        &mut self,
        now: Instant,
        chrome: &mut dyn PageChrome,
        history: &mut dyn HistoryPort,
    ) {
        let done = self.session.as_ref().is_some_and(|s| {
            matches!(s.phase, ModalPhase::Expanding | ModalPhase::Closing)
                && s.morph.is_complete(now)
        });
        if done {
            let _ = self.animation_complete(now, chrome, history);
        }
    }

    /// Remove the modal immediately without writing history, e.g. when
    /// the route changed underneath it.
    pub fn abort(&mut self, chrome: &mut dyn PageChrome) {
        if let Some(session) = self.session.take() {
            log::debug!("modal {} torn down", session.slug);
            chrome.set_body_scroll_locked(false);
        }
    }

    /// Snapshot at `now`.
    #[must_use]
    pub fn state(&self, now: Instant) -> ModalState {
        let Some(session) = &self.session else {
            return ModalState::default();
        };
        ModalState {
            selected: Some(session.slug.clone()),
            image_rect: Some(session.morph.sample(now)),
            is_open: matches!(
                session.phase,
                ModalPhase::Expanding | ModalPhase::Open
            ),
            is_closing: session.phase == ModalPhase::Closing,
            phase: session.phase,
            content_visible: session
                .content
                .is_some_and(|c| c.is_visible(now)),
        }
    }

    /// Content reveal of the open modal.
    #[must_use]
    pub fn content(&self) -> Option<&ContentReveal> {
        self.session.as_ref().and_then(|s| s.content.as_ref())
    }
}

impl std::fmt::Debug for ModalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalCoordinator")
            .field("phase", &self.phase())
            .field("selected", &self.selected())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::host::fake::{FakeChrome, FakeHistory, FakeRects, FakeScroll};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    const THUMB: Rect = Rect::new(120.0, 40.0, 300.0, 400.0);
    const HERO: Rect = Rect::new(0.0, 0.0, 1000.0, 540.0);

    struct Rig {
        modal: ModalCoordinator,
        arbiter: ScrollArbiter,
        scroll: FakeScroll,
        chrome: FakeChrome,
        history: FakeHistory,
        rects: FakeRects,
    }

    impl Rig {
        fn new() -> Self {
            let scroll = FakeScroll::default();
            let rects = FakeRects::new(Viewport::new(1000.0, 900.0));
            rects.place("wedding-fm", THUMB);
            Self {
                modal: ModalCoordinator::new(RevealOptions::default()),
                arbiter: ScrollArbiter::new(scroll.clone()),
                scroll,
                chrome: FakeChrome::default(),
                history: FakeHistory::starting_at("/"),
                rects,
            }
        }

        fn open(&mut self, slug: &str, now: Instant) -> Outcome {
            let mut chrome = self.chrome.clone();
            let mut history = self.history.clone();
            self.modal.open(
                slug,
                "/",
                now,
                &self.rects,
                &self.arbiter,
                &mut chrome,
                &mut history,
            )
        }

        fn tick(&mut self, now: Instant) {
            let mut chrome = self.chrome.clone();
            let mut history = self.history.clone();
            self.modal.tick(now, &mut chrome, &mut history);
        }
    }

    #[test]
    fn open_expand_close_round_trip() {
        let mut rig = Rig::new();
        let t0 = Instant::now();

        assert!(rig.open("wedding-fm", t0).is_accepted());
        assert_eq!(rig.history.current(), "/?project=wedding-fm");
        assert_eq!(rig.modal.phase(), ModalPhase::Expanding);
        assert!(rig.scroll.is_suspended());
        assert!(rig.chrome.body_locked());
        assert_eq!(rig.modal.state(t0).image_rect, Some(THUMB));

        rig.tick(t0 + ms(850));
        assert_eq!(rig.modal.phase(), ModalPhase::Open);
        let open = rig.modal.state(t0 + ms(850));
        assert_eq!(open.image_rect, Some(HERO));
        assert!(!open.content_visible);
        assert!(rig.modal.state(t0 + ms(900)).content_visible);

        // Page scrolled while open: the thumbnail now sits elsewhere.
        let moved = Rect::new(-200.0, 40.0, 300.0, 400.0);
        rig.rects.place("wedding-fm", moved);
        let t1 = t0 + ms(2000);
        assert!(rig.modal.close(t1, &rig.rects).is_accepted());
        let closing = rig.modal.state(t1 + ms(50));
        assert!(closing.is_closing);
        assert!(!closing.content_visible);
        assert_eq!(closing.image_rect, Some(HERO), "content fades first");

        rig.tick(t1 + ms(949));
        assert_eq!(rig.modal.phase(), ModalPhase::Closing);
        assert_eq!(rig.modal.state(t1 + ms(950)).image_rect, Some(moved));
        rig.tick(t1 + ms(950));
        assert_eq!(rig.modal.phase(), ModalPhase::Closed);
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.chrome.body_locked());
        assert_eq!(rig.history.current(), "/");
        assert_eq!(rig.history.len(), 3);
    }

    #[test]
    fn immediate_close_restores_everything() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        assert!(rig.modal.close(t0 + ms(1), &rig.rects).is_accepted());
        rig.tick(t0 + ms(2000));
        assert_eq!(rig.modal.state(t0 + ms(2000)), ModalState::default());
        assert!(!rig.scroll.is_suspended());
        assert_eq!(rig.history.current(), "/");
    }

    #[test]
    fn back_button_closes_without_history_entry() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        rig.tick(t0 + ms(850));
        assert_eq!(rig.history.len(), 2);

        assert_eq!(rig.history.back().as_deref(), Some("/"));
        assert!(rig.modal.pop_state(t0 + ms(1000), &rig.rects).is_accepted());
        rig.tick(t0 + ms(5000));
        assert_eq!(rig.modal.phase(), ModalPhase::Closed);
        assert_eq!(rig.history.push_count(), 1);
        assert_eq!(rig.history.current(), "/");
    }

    #[test]
    fn pop_state_while_closed_is_not_handled() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.modal.pop_state(Instant::now(), &rig.rects),
            Outcome::Ignored(IgnoreReason::ModalPhase)
        );
    }

    #[test]
    fn open_without_thumbnail_is_ignored() {
        let mut rig = Rig::new();
        assert_eq!(
            rig.open("missing", Instant::now()),
            Outcome::Ignored(IgnoreReason::NoThumbnail)
        );
        assert_eq!(rig.history.push_count(), 0);
        assert!(!rig.scroll.is_suspended());
    }

    #[test]
    fn second_open_is_ignored() {
        let mut rig = Rig::new();
        rig.rects.place("anna", THUMB);
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        assert_eq!(
            rig.open("anna", t0 + ms(10)),
            Outcome::Ignored(IgnoreReason::ModalPhase)
        );
        assert_eq!(rig.modal.selected(), Some("wedding-fm"));
        assert_eq!(rig.history.push_count(), 1);
    }

    #[test]
    fn close_falls_back_to_saved_rect() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        rig.tick(t0 + ms(850));
        rig.rects.remove("wedding-fm");
        let _ = rig.modal.close(t0 + ms(1000), &rig.rects);
        assert_eq!(rig.modal.state(t0 + ms(1950)).image_rect, Some(THUMB));
    }

    #[test]
    fn deep_link_opens_without_history() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let mut chrome = rig.chrome.clone();
        assert!(rig
            .modal
            .open_from_url(
                "?project=wedding-fm",
                "/",
                t0,
                &rig.rects,
                &rig.arbiter,
                &mut chrome,
            )
            .is_accepted());
        assert_eq!(rig.modal.phase(), ModalPhase::Expanding);
        assert_eq!(rig.history.push_count(), 0);
    }

    #[test]
    fn deep_link_without_thumbnail_opens_in_final_state() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let mut chrome = rig.chrome.clone();
        let _ = rig.modal.open_from_url(
            "project=gone",
            "/",
            t0,
            &rig.rects,
            &rig.arbiter,
            &mut chrome,
        );
        assert_eq!(rig.modal.phase(), ModalPhase::Open);
        assert_eq!(rig.modal.state(t0).image_rect, Some(HERO));
    }

    #[test]
    fn host_completion_advances_phase() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        let mut chrome = rig.chrome.clone();
        let mut history = rig.history.clone();
        assert!(rig
            .modal
            .animation_complete(t0 + ms(800), &mut chrome, &mut history)
            .is_accepted());
        assert_eq!(rig.modal.phase(), ModalPhase::Open);
        assert_eq!(
            rig.modal
                .animation_complete(t0 + ms(900), &mut chrome, &mut history),
            Outcome::Ignored(IgnoreReason::NotAnimating)
        );
    }

    #[test]
    fn abort_releases_without_history() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.open("wedding-fm", t0);
        let mut chrome = rig.chrome.clone();
        rig.modal.abort(&mut chrome);
        assert!(!rig.modal.is_active());
        assert!(!rig.scroll.is_suspended());
        assert_eq!(rig.history.push_count(), 1);
    }
}
