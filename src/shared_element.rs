//! Shared-element (FLIP) transition across a route change.
//!
//! The gallery captures the live rectangle of a clicked thumbnail and
//! offers it as a [`TransitionRequest`] before pushing the detail route.
//! The detail page, on mount, takes the request and morphs the image from
//! the captured rectangle to its hero position. Going back reverses the
//! morph onto the thumbnail's live position in the gallery.
//!
//! A single [`TransitionSlot`] holds at most one request. A request that
//! is never consumed expires after `request_ttl_ms`.

use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::animation::{stagger, Motion, RectTween, Tween};
use crate::geometry::{CapturedRect, Rect, Viewport};
use crate::history::split_url;
use crate::host::{PageChrome, RectProvider, Router};
use crate::options::RevealOptions;
use crate::outcome::{IgnoreReason, Outcome};
use crate::scroll::{ScrollArbiter, ScrollHolder, ScrollLock};

/// Which way a transition runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Thumbnail to hero.
    #[default]
    Forward,
    /// Hero back to thumbnail.
    Backward,
}

/// A pending shared-element transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    /// Content item identifier.
    pub slug: String,
    /// Image shown during the morph.
    pub source_image: String,
    /// Rectangle the morph starts from, with the scroll offset at capture.
    pub rect: CapturedRect,
    /// Which way the morph runs.
    pub direction: Direction,
    /// Rectangle to land on when the live target cannot be measured.
    pub fallback: Option<CapturedRect>,
    /// When the request was offered.
    pub created_at: Instant,
}

/// Process-wide holder of the one pending [`TransitionRequest`].
#[derive(Debug)]
pub struct TransitionSlot {
    pending: Option<TransitionRequest>,
    ttl: Duration,
}

impl TransitionSlot {
    /// Empty slot whose requests expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { pending: None, ttl }
    }

    fn live(&self, now: Instant) -> Option<&TransitionRequest> {
        self.pending.as_ref().filter(|r| {
            now.saturating_duration_since(r.created_at) < self.ttl
        })
    }

    /// Whether an unexpired request is waiting.
    #[must_use]
    pub fn is_occupied(&self, now: Instant) -> bool {
        self.live(now).is_some()
    }

    /// Store `request`. Rejected while another unexpired request waits;
    /// an expired one is replaced.
    pub fn offer(&mut self, request: TransitionRequest) -> Outcome {
        if let Some(waiting) = self.live(request.created_at) {
            log::debug!(
                "transition for {} rejected, {} still pending",
                request.slug,
                waiting.slug
            );
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        if let Some(stale) = self.pending.take() {
            log::debug!("abandoned transition for {} replaced", stale.slug);
        }
        self.pending = Some(request);
        Outcome::Accepted
    }

    /// The waiting request, if any and unexpired.
    #[must_use]
    pub fn peek(&self, now: Instant) -> Option<&TransitionRequest> {
        self.live(now)
    }

    /// Consume the waiting request if it runs in `direction` and, when
    /// `slug` is given, belongs to that item. Expired requests are
    /// dropped and never returned.
    pub fn take_matching(
        &mut self,
        slug: Option<&str>,
        direction: Direction,
        now: Instant,
    ) -> Option<TransitionRequest> {
        let matches = self.live(now).is_some_and(|r| {
            r.direction == direction && slug.is_none_or(|s| s == r.slug)
        });
        if matches {
            return self.pending.take();
        }
        if self.pending.is_some() && self.live(now).is_none() {
            self.pending = None;
        }
        None
    }

    /// Drop a waiting request that runs in `direction`.
    pub fn discard(&mut self, direction: Direction) {
        if let Some(stale) = self.pending.take_if(|r| r.direction == direction)
        {
            log::debug!("unclaimed transition for {} dropped", stale.slug);
        }
    }

    /// Drop any waiting request.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Staggered fade-in of page content after an image lands.
#[derive(Debug, Clone, Copy)]
pub struct ContentReveal {
    start: Instant,
    motion: Motion,
    base: Duration,
    step: Duration,
}

impl ContentReveal {
    /// Content that starts revealing at `start`.
    #[must_use]
    pub fn at(start: Instant, options: &RevealOptions) -> Self {
        Self {
            start,
            motion: options.content,
            base: Duration::from_millis(options.stagger_base_ms),
            step: Duration::from_millis(options.stagger_step_ms),
        }
    }

    /// Content shown in its final state with no animation.
    #[must_use]
    pub fn immediate(now: Instant) -> Self {
        Self {
            start: now,
            motion: Motion::snap(),
            base: Duration::ZERO,
            step: Duration::ZERO,
        }
    }

    /// Whether content is visible at all.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        now >= self.start
    }

    /// Delay of the `index`-th content block after the reveal starts.
    #[must_use]
    pub fn block_delay(&self, index: usize) -> Duration {
        stagger(self.base, self.step, index)
    }

    /// Eased fade-in progress of the `index`-th content block.
    #[must_use]
    pub fn block_progress(&self, index: usize, now: Instant) -> f32 {
        Tween::delayed(self.start, self.block_delay(index), self.motion)
            .eased(now)
    }
}

/// What the detail overlay renders this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailFrame {
    /// Item being shown.
    pub slug: String,
    /// Image shown during the morph.
    pub source_image: String,
    /// Rectangle of the morphing image, `None` once it has landed.
    pub image: Option<Rect>,
    /// Which way the image travels.
    pub direction: Direction,
    /// Whether page content is visible.
    pub content_visible: bool,
}

struct Flight {
    slug: String,
    source_image: String,
    direction: Direction,
    morph: RectTween,
    _lock: ScrollLock,
}

struct Landed {
    slug: String,
    source_image: String,
    content: ContentReveal,
}

struct PendingPush {
    href: String,
    at: Instant,
}

/// Drives the detail-route morph and its reverse.
pub struct SharedElementCoordinator {
    options: RevealOptions,
    slot: TransitionSlot,
    flight: Option<Flight>,
    landed: Option<Landed>,
    capture: Option<(String, CapturedRect)>,
    pending_push: Option<PendingPush>,
    awaiting_route: Option<String>,
}

impl SharedElementCoordinator {
    /// Idle coordinator.
    #[must_use]
    pub fn new(options: RevealOptions) -> Self {
        let ttl = Duration::from_millis(options.request_ttl_ms);
        Self {
            options,
            slot: TransitionSlot::new(ttl),
            flight: None,
            landed: None,
            capture: None,
            pending_push: None,
            awaiting_route: None,
        }
    }

    /// The request slot.
    #[must_use]
    pub fn slot(&self) -> &TransitionSlot {
        &self.slot
    }

    /// Whether a morph is running, a request waits, or a route push is
    /// scheduled.
    #[must_use]
    pub fn is_busy(&self, now: Instant) -> bool {
        self.flight.is_some()
            || self.pending_push.is_some()
            || self.slot.is_occupied(now)
    }

    /// Whether a morph is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Source side: capture the thumbnail for `slug`, offer a forward
    /// request and push `href`.
    ///
    /// A thumbnail that cannot be measured still navigates, without a
    /// morph.
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &mut self,
        slug: &str,
        source_image: &str,
        href: &str,
        now: Instant,
        rects: &dyn RectProvider,
        scroll: &ScrollArbiter,
        router: &mut dyn Router,
    ) -> Outcome {
        if self.is_busy(now) {
            return Outcome::Ignored(IgnoreReason::Busy);
        }

        if let Some(rect) = rects.thumbnail_rect(slug) {
            let captured = CapturedRect {
                rect,
                scroll_y: scroll.scroll_y(),
            };
            let outcome = self.slot.offer(TransitionRequest {
                slug: slug.to_owned(),
                source_image: source_image.to_owned(),
                rect: captured,
                direction: Direction::Forward,
                fallback: None,
                created_at: now,
            });
            if !outcome.is_accepted() {
                return outcome;
            }
            self.capture = Some((slug.to_owned(), captured));
            self.awaiting_route = Some(split_url(href).0.to_owned());
        } else {
            log::debug!("no thumbnail for {slug}, navigating without morph");
        }

        if let Err(e) = router.push(href) {
            log::warn!("detail route {href} not navigated: {e}");
            self.slot.clear();
            self.awaiting_route = None;
        }
        Outcome::Accepted
    }

    /// The router reports `pathname`. A waiting request bound for some
    /// other route, and any scheduled push, are dropped.
    pub fn route_changed(&mut self, pathname: &str) {
        let Some(target) =
            self.awaiting_route.take_if(|t| t.as_str() != pathname)
        else {
            return;
        };
        log::debug!("left for {pathname} before {target} mounted");
        self.slot.clear();
        self.pending_push = None;
    }

    fn drop_flight(&mut self, chrome: &mut dyn PageChrome) {
        if self.flight.take().is_some() {
            chrome.set_body_scroll_locked(false);
        }
    }

    /// Destination side: the detail page for `slug` mounted.
    ///
    /// With a matching forward request the image morphs from the captured
    /// rectangle to the hero. Without one the page renders its final
    /// state immediately and the call is ignored; a forward request for
    /// another item is dropped.
    pub fn mount_detail(
        &mut self,
        slug: &str,
        now: Instant,
        viewport: Viewport,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) -> Outcome {
        let Some(request) =
            self.slot.take_matching(Some(slug), Direction::Forward, now)
        else {
            self.slot.discard(Direction::Forward);
            self.awaiting_route = None;
            self.drop_flight(chrome);
            self.landed = Some(Landed {
                slug: slug.to_owned(),
                source_image: String::new(),
                content: ContentReveal::immediate(now),
            });
            return Outcome::Ignored(IgnoreReason::NoRequest);
        };

        self.awaiting_route = None;
        // The hero sits at the top of the document.
        scroll.scroll_to(0.0, true);
        chrome.set_body_scroll_locked(true);

        let hero = viewport.hero_rect(self.options.hero_fraction);
        log::debug!("detail morph {slug}: {:?} -> {hero:?}", request.rect.rect);
        self.capture = Some((request.slug.clone(), request.rect));
        self.landed = None;
        self.flight = Some(Flight {
            slug: request.slug,
            source_image: request.source_image,
            direction: Direction::Forward,
            morph: RectTween::new(
                request.rect.rect,
                hero,
                Tween::new(now, self.options.morph),
            ),
            _lock: scroll.acquire(ScrollHolder::DetailReveal),
        });
        Outcome::Accepted
    }

    /// Back from the detail page for `slug`: offer a backward request
    /// carrying the hero rectangle and schedule the push of
    /// `gallery_href`.
    pub fn detail_back(
        &mut self,
        slug: &str,
        gallery_href: &str,
        now: Instant,
        viewport: Viewport,
    ) -> Outcome {
        if self.flight.is_some() || self.pending_push.is_some() {
            return Outcome::Ignored(IgnoreReason::Busy);
        }

        let capture = self
            .capture
            .as_ref()
            .filter(|(s, _)| s == slug)
            .map(|(_, c)| *c);
        let source_image = self
            .landed
            .as_ref()
            .map(|l| l.source_image.clone())
            .unwrap_or_default();
        let outcome = self.slot.offer(TransitionRequest {
            slug: slug.to_owned(),
            source_image,
            rect: CapturedRect {
                rect: viewport.hero_rect(self.options.hero_fraction),
                scroll_y: 0.0,
            },
            direction: Direction::Backward,
            fallback: capture,
            created_at: now,
        });
        if !outcome.is_accepted() {
            return outcome;
        }

        self.landed = None;
        self.awaiting_route = Some(split_url(gallery_href).0.to_owned());
        self.pending_push = Some(PendingPush {
            href: gallery_href.to_owned(),
            at: now + Duration::from_millis(self.options.back_push_delay_ms),
        });
        Outcome::Accepted
    }

    /// The gallery mounted. With a backward request waiting, restore the
    /// captured scroll offset and morph the hero down onto the live
    /// thumbnail, or onto the captured rectangle when the thumbnail is
    /// gone. A forward request whose detail page never mounted is
    /// dropped.
    pub fn mount_gallery(
        &mut self,
        now: Instant,
        rects: &dyn RectProvider,
        scroll: &ScrollArbiter,
        chrome: &mut dyn PageChrome,
    ) -> Outcome {
        self.slot.discard(Direction::Forward);
        self.awaiting_route = None;
        let Some(request) =
            self.slot.take_matching(None, Direction::Backward, now)
        else {
            return Outcome::Ignored(IgnoreReason::NoRequest);
        };

        if let Some(fallback) = request.fallback {
            scroll.scroll_to(fallback.scroll_y, true);
        }
        let target = rects
            .thumbnail_rect(&request.slug)
            .or_else(|| request.fallback.map(|c| c.rect));
        let Some(target) = target else {
            log::debug!("no return target for {}, skipping morph", request.slug);
            return Outcome::Ignored(IgnoreReason::NoThumbnail);
        };

        chrome.set_body_scroll_locked(true);
        self.capture = None;
        self.flight = Some(Flight {
            slug: request.slug,
            source_image: request.source_image,
            direction: Direction::Backward,
            morph: RectTween::new(
                request.rect.rect,
                target,
                Tween::new(now, self.options.morph),
            ),
            _lock: scroll.acquire(ScrollHolder::DetailReveal),
        });
        Outcome::Accepted
    }

    /// The host reports that the morph finished rendering.
    pub fn animation_complete(
        &mut self,
        now: Instant,
        chrome: &mut dyn PageChrome,
    ) -> Outcome {
        let Some(flight) = self.flight.take() else {
            return Outcome::Ignored(IgnoreReason::NotAnimating);
        };

        chrome.set_body_scroll_locked(false);
        if flight.direction == Direction::Forward {
            let delay = Duration::from_millis(self.options.content_delay_ms);
            self.landed = Some(Landed {
                slug: flight.slug,
                source_image: flight.source_image,
                content: ContentReveal::at(now + delay, &self.options),
            });
        }
        Outcome::Accepted
    }

    /// Fire the scheduled route push and finish completed morphs.
    pub fn tick(
        &mut self,
        now: Instant,
        router: &mut dyn Router,
        chrome: &mut dyn PageChrome,
    ) {
        if self.pending_push.as_ref().is_some_and(|p| now >= p.at) {
            if let Some(push) = self.pending_push.take() {
                if let Err(e) = router.push(&push.href) {
                    log::warn!("back to {} not navigated: {e}", push.href);
                    self.slot.clear();
                    self.awaiting_route = None;
                }
            }
        }

        if self.flight.as_ref().is_some_and(|f| f.morph.is_complete(now)) {
            let _ = self.animation_complete(now, chrome);
        }
    }

    /// Drop every in-flight morph and pending request.
    pub fn abort(&mut self, chrome: &mut dyn PageChrome) {
        self.drop_flight(chrome);
        self.pending_push = None;
        self.slot.clear();
        self.awaiting_route = None;
    }

    /// Overlay snapshot at `now`.
    #[must_use]
    pub fn frame(&self, now: Instant) -> Option<DetailFrame> {
        if let Some(flight) = &self.flight {
            return Some(DetailFrame {
                slug: flight.slug.clone(),
                source_image: flight.source_image.clone(),
                image: Some(flight.morph.sample(now)),
                direction: flight.direction,
                content_visible: false,
            });
        }
        self.landed.as_ref().map(|landed| DetailFrame {
            slug: landed.slug.clone(),
            source_image: landed.source_image.clone(),
            image: None,
            direction: Direction::Forward,
            content_visible: landed.content.is_visible(now),
        })
    }

    /// Content reveal of the landed detail page.
    #[must_use]
    pub fn content(&self) -> Option<&ContentReveal> {
        self.landed.as_ref().map(|l| &l.content)
    }
}

impl std::fmt::Debug for SharedElementCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedElementCoordinator")
            .field("slot", &self.slot)
            .field("animating", &self.flight.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{FakeChrome, FakeRects, FakeRouter, FakeScroll};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    const THUMB: Rect = Rect::new(120.0, 40.0, 300.0, 400.0);

    struct Rig {
        shared: SharedElementCoordinator,
        arbiter: ScrollArbiter,
        scroll: FakeScroll,
        router: FakeRouter,
        chrome: FakeChrome,
        rects: FakeRects,
    }

    impl Rig {
        fn new() -> Self {
            let scroll = FakeScroll::default();
            let rects = FakeRects::new(Viewport::new(1000.0, 900.0));
            rects.place("wedding-fm", THUMB);
            Self {
                shared: SharedElementCoordinator::new(RevealOptions::default()),
                arbiter: ScrollArbiter::new(scroll.clone()),
                scroll,
                router: FakeRouter::default(),
                chrome: FakeChrome::default(),
                rects,
            }
        }

        fn select(&mut self, slug: &str, now: Instant) -> Outcome {
            let mut router = self.router.clone();
            self.shared.select(
                slug,
                "/img/a.jpg",
                &format!("/work/{slug}"),
                now,
                &self.rects,
                &self.arbiter,
                &mut router,
            )
        }

        fn mount_detail(&mut self, slug: &str, now: Instant) -> Outcome {
            let mut chrome = self.chrome.clone();
            let vp = self.rects.viewport();
            self.shared
                .mount_detail(slug, now, vp, &self.arbiter, &mut chrome)
        }

        fn tick(&mut self, now: Instant) {
            let mut router = self.router.clone();
            let mut chrome = self.chrome.clone();
            self.shared.tick(now, &mut router, &mut chrome);
        }
    }

    fn request(slug: &str, at: Instant) -> TransitionRequest {
        TransitionRequest {
            slug: slug.to_owned(),
            source_image: String::new(),
            rect: CapturedRect::default(),
            direction: Direction::Forward,
            fallback: None,
            created_at: at,
        }
    }

    #[test]
    fn slot_rejects_second_offer_until_expired() {
        let t0 = Instant::now();
        let mut slot = TransitionSlot::new(ms(5000));
        assert!(slot.offer(request("a", t0)).is_accepted());
        assert_eq!(
            slot.offer(request("b", t0 + ms(100))),
            Outcome::Ignored(IgnoreReason::Busy)
        );
        assert!(slot.offer(request("b", t0 + ms(5000))).is_accepted());
        assert_eq!(slot.peek(t0 + ms(5000)).unwrap().slug, "b");
    }

    #[test]
    fn slot_consumes_once_and_checks_slug() {
        let t0 = Instant::now();
        let mut slot = TransitionSlot::new(ms(5000));
        let _ = slot.offer(request("a", t0));
        assert!(slot.take_matching(Some("b"), Direction::Forward, t0).is_none());
        assert!(slot
            .take_matching(Some("a"), Direction::Backward, t0)
            .is_none());
        assert!(slot.take_matching(Some("a"), Direction::Forward, t0).is_some());
        assert!(slot.take_matching(Some("a"), Direction::Forward, t0).is_none());
    }

    #[test]
    fn expired_request_is_never_consumed() {
        let t0 = Instant::now();
        let mut slot = TransitionSlot::new(ms(5000));
        let _ = slot.offer(request("a", t0));
        assert!(slot
            .take_matching(Some("a"), Direction::Forward, t0 + ms(6000))
            .is_none());
        assert!(!slot.is_occupied(t0));
    }

    #[test]
    fn forward_morph_lands_on_hero_then_reveals_content() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        rig.scroll.set_scroll_y(250.0);

        assert!(rig.select("wedding-fm", t0).is_accepted());
        assert_eq!(rig.router.pushes(), vec!["/work/wedding-fm".to_owned()]);
        let pending = rig.shared.slot().peek(t0).unwrap();
        assert_eq!(pending.rect.scroll_y, 250.0);

        let t1 = t0 + ms(40);
        assert!(rig.mount_detail("wedding-fm", t1).is_accepted());
        assert!(rig.scroll.is_suspended());
        assert!(rig.chrome.body_locked());
        assert_eq!(rig.scroll.jumps(), vec![0.0]);

        let start = rig.shared.frame(t1).unwrap();
        assert_eq!(start.image, Some(THUMB));
        assert!(!start.content_visible);
        let end = rig.shared.frame(t1 + ms(850)).unwrap();
        assert_eq!(end.image, Some(Rect::new(0.0, 0.0, 1000.0, 540.0)));

        rig.tick(t1 + ms(850));
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.chrome.body_locked());
        assert!(!rig.shared.is_busy(t1 + ms(850)));

        let landed = rig.shared.frame(t1 + ms(880)).unwrap();
        assert_eq!(landed.image, None);
        assert!(!landed.content_visible);
        assert!(rig.shared.frame(t1 + ms(900)).unwrap().content_visible);

        let content = rig.shared.content().unwrap();
        assert_eq!(content.block_delay(0), ms(250));
        assert_eq!(content.block_delay(2), ms(450));
        assert_eq!(content.block_progress(1, t1 + ms(900)), 0.0);
    }

    #[test]
    fn direct_link_shows_final_state() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        assert_eq!(
            rig.mount_detail("wedding-fm", t0),
            Outcome::Ignored(IgnoreReason::NoRequest)
        );
        let frame = rig.shared.frame(t0).unwrap();
        assert_eq!(frame.image, None);
        assert!(frame.content_visible);
        assert_eq!(rig.shared.content().unwrap().block_progress(5, t0), 1.0);
        assert!(!rig.scroll.is_suspended());
    }

    #[test]
    fn mismatched_slug_falls_back() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        assert!(!rig.mount_detail("other", t0 + ms(30)).is_accepted());
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.shared.is_busy(t0 + ms(30)));
    }

    #[test]
    fn gallery_mount_drops_unclaimed_forward_request() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        assert!(rig.shared.is_busy(t0 + ms(50)));

        let mut chrome = rig.chrome.clone();
        assert_eq!(
            rig.shared.mount_gallery(
                t0 + ms(60),
                &rig.rects,
                &rig.arbiter,
                &mut chrome
            ),
            Outcome::Ignored(IgnoreReason::NoRequest)
        );
        assert!(!rig.shared.is_busy(t0 + ms(60)));
    }

    #[test]
    fn leaving_for_another_route_drops_request() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);

        rig.shared.route_changed("/work/wedding-fm");
        assert!(rig.shared.slot().is_occupied(t0 + ms(20)));
        rig.shared.route_changed("/about");
        assert!(!rig.shared.is_busy(t0 + ms(30)));
    }

    #[test]
    fn back_push_is_dropped_when_route_moves_elsewhere() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        let _ = rig.mount_detail("wedding-fm", t0);
        rig.tick(t0 + ms(900));
        let vp = rig.rects.viewport();
        let t1 = t0 + ms(1000);
        let _ = rig.shared.detail_back("wedding-fm", "/?x=1", t1, vp);

        rig.shared.route_changed("/contact");
        rig.tick(t0 + ms(1100));
        assert_eq!(rig.router.pushes().len(), 1);
        assert!(!rig.shared.is_busy(t0 + ms(1100)));
    }

    #[test]
    fn detail_mount_during_return_morph_unlocks_body() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        let _ = rig.mount_detail("wedding-fm", t0);
        rig.tick(t0 + ms(900));
        let vp = rig.rects.viewport();
        let _ = rig.shared.detail_back("wedding-fm", "/", t0 + ms(1000), vp);
        rig.tick(t0 + ms(1010));
        let mut chrome = rig.chrome.clone();
        let t2 = t0 + ms(1050);
        let _ = rig
            .shared
            .mount_gallery(t2, &rig.rects, &rig.arbiter, &mut chrome);
        assert!(rig.chrome.body_locked());

        assert!(!rig.mount_detail("wedding-fm", t2 + ms(100)).is_accepted());
        assert!(!rig.chrome.body_locked());
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.shared.is_animating());
    }

    #[test]
    fn second_select_while_pending_is_rejected() {
        let mut rig = Rig::new();
        rig.rects.place("anna", THUMB);
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        assert_eq!(
            rig.select("anna", t0 + ms(5)),
            Outcome::Ignored(IgnoreReason::Busy)
        );
        assert_eq!(rig.router.pushes().len(), 1);
    }

    #[test]
    fn unmeasurable_thumbnail_navigates_without_request() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        assert!(rig.select("missing", t0).is_accepted());
        assert_eq!(rig.router.pushes(), vec!["/work/missing".to_owned()]);
        assert!(!rig.shared.slot().is_occupied(t0));
    }

    #[test]
    fn back_morphs_onto_live_thumbnail() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        rig.scroll.set_scroll_y(250.0);
        let _ = rig.select("wedding-fm", t0);
        let _ = rig.mount_detail("wedding-fm", t0);
        rig.tick(t0 + ms(900));

        let vp = rig.rects.viewport();
        let t1 = t0 + ms(2000);
        assert!(rig.shared.detail_back("wedding-fm", "/", t1, vp).is_accepted());
        rig.tick(t1 + ms(9));
        assert_eq!(rig.router.pushes().len(), 1);
        rig.tick(t1 + ms(10));
        assert_eq!(rig.router.pushes().last().map(String::as_str), Some("/"));

        // The gallery re-rendered with the thumbnail somewhere else.
        let moved = Rect::new(300.0, 40.0, 300.0, 400.0);
        rig.rects.place("wedding-fm", moved);
        let t2 = t1 + ms(60);
        let mut chrome = rig.chrome.clone();
        assert!(rig
            .shared
            .mount_gallery(t2, &rig.rects, &rig.arbiter, &mut chrome)
            .is_accepted());
        assert_eq!(rig.scroll.jumps().last(), Some(&250.0));
        let frame = rig.shared.frame(t2 + ms(850)).unwrap();
        assert_eq!(frame.image, Some(moved));
        assert_eq!(frame.direction, Direction::Backward);

        rig.tick(t2 + ms(850));
        assert!(rig.shared.frame(t2 + ms(900)).is_none());
        assert!(!rig.scroll.is_suspended());
    }

    #[test]
    fn back_falls_back_to_captured_rect() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        let _ = rig.mount_detail("wedding-fm", t0);
        rig.tick(t0 + ms(900));
        let vp = rig.rects.viewport();
        let _ = rig.shared.detail_back("wedding-fm", "/", t0 + ms(1000), vp);
        rig.tick(t0 + ms(1010));

        rig.rects.remove("wedding-fm");
        let mut chrome = rig.chrome.clone();
        let t2 = t0 + ms(1100);
        let _ = rig
            .shared
            .mount_gallery(t2, &rig.rects, &rig.arbiter, &mut chrome);
        let frame = rig.shared.frame(t2 + ms(850)).unwrap();
        assert_eq!(frame.image, Some(THUMB));
    }

    #[test]
    fn gallery_mount_without_request_is_ignored() {
        let mut rig = Rig::new();
        let mut chrome = rig.chrome.clone();
        assert_eq!(
            rig.shared.mount_gallery(
                Instant::now(),
                &rig.rects,
                &rig.arbiter,
                &mut chrome
            ),
            Outcome::Ignored(IgnoreReason::NoRequest)
        );
    }

    #[test]
    fn abort_releases_scroll() {
        let mut rig = Rig::new();
        let t0 = Instant::now();
        let _ = rig.select("wedding-fm", t0);
        let _ = rig.mount_detail("wedding-fm", t0);
        let mut chrome = rig.chrome.clone();
        rig.shared.abort(&mut chrome);
        assert!(!rig.scroll.is_suspended());
        assert!(!rig.chrome.body_locked());
        assert!(!rig.shared.is_busy(t0));
    }
}
