//! The choreography engine: one [`Choreographer`] owning every transition
//! coordinator, driven by [`Command`]s and sampled as a [`Frame`].

mod command;
mod execute;
mod frame;

use web_time::Instant;

pub use self::command::{AnimationTarget, Command};
pub use self::frame::{Frame, ModalFrame};
use crate::gallery::Gallery;
use crate::host::Host;
use crate::modal::ModalCoordinator;
use crate::options::Options;
use crate::page_exit::PageExitCoordinator;
use crate::scroll::{ScrollArbiter, ScrollController};
use crate::shared_element::{Direction, SharedElementCoordinator};
use crate::split_reveal::SplitRevealCoordinator;

/// Owner of every transition coordinator and the resources they share.
///
/// # Driving the engine
///
/// The host forwards intents as [`Command`]s through
/// [`execute`](Self::execute), calls [`tick`](Self::tick) once per
/// animation frame, and renders the overlays from [`frame`](Self::frame).
/// All three take the current instant explicitly.
///
/// # Serialization
///
/// Only one screen-owning transition runs at a time: split reveals,
/// detail morphs and the modal each refuse to start while another is in
/// flight. A plain page exit may start while the modal is open, since the
/// site navigation stays clickable above it; the route change it causes
/// tears the modal down.
pub struct Choreographer {
    options: Options,
    host: Host,
    scroll: ScrollArbiter,
    route: String,
    gallery: Gallery,
    page_exit: PageExitCoordinator,
    split: SplitRevealCoordinator,
    shared: SharedElementCoordinator,
    modal: ModalCoordinator,
}

impl Choreographer {
    /// Engine for a page currently showing `route`.
    pub fn new(
        options: Options,
        host: Host,
        scroll: impl ScrollController + 'static,
        route: &str,
    ) -> Self {
        log::info!("choreographer started at {route}");
        Self {
            page_exit: PageExitCoordinator::new(options.page_exit.clone()),
            split: SplitRevealCoordinator::new(options.split.clone()),
            shared: SharedElementCoordinator::new(options.detail.clone()),
            modal: ModalCoordinator::new(options.modal.clone()),
            options,
            host,
            scroll: ScrollArbiter::new(scroll),
            route: route.to_owned(),
            gallery: Gallery::default(),
        }
    }

    /// Attach the gallery used for modal neighbor links.
    #[must_use]
    pub fn with_gallery(mut self, gallery: Gallery) -> Self {
        self.gallery = gallery;
        self
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options. Refused (returns `false`) while any
    /// transition is in flight, since running tweens were built from the
    /// old values.
    pub fn set_options(&mut self, options: Options, now: Instant) -> bool {
        if !self.is_idle(now) {
            log::warn!("options not applied, a transition is in flight");
            return false;
        }
        self.page_exit = PageExitCoordinator::new(options.page_exit.clone());
        self.split = SplitRevealCoordinator::new(options.split.clone());
        self.shared = SharedElementCoordinator::new(options.detail.clone());
        self.modal = ModalCoordinator::new(options.modal.clone());
        self.options = options;
        true
    }

    /// Last pathname observed from the router.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The shared scroll arbiter.
    #[must_use]
    pub fn scroll(&self) -> &ScrollArbiter {
        &self.scroll
    }

    /// Page-exit coordinator.
    #[must_use]
    pub fn page_exit(&self) -> &PageExitCoordinator {
        &self.page_exit
    }

    /// Split-reveal coordinator.
    #[must_use]
    pub fn split(&self) -> &SplitRevealCoordinator {
        &self.split
    }

    /// Detail-route coordinator.
    #[must_use]
    pub fn shared(&self) -> &SharedElementCoordinator {
        &self.shared
    }

    /// Modal coordinator.
    #[must_use]
    pub fn modal(&self) -> &ModalCoordinator {
        &self.modal
    }

    /// Whether nothing is in flight.
    #[must_use]
    pub fn is_idle(&self, now: Instant) -> bool {
        !self.page_exit.is_exiting()
            && !self.split.is_transitioning()
            && !self.shared.is_busy(now)
            && !self.modal.is_active()
    }

    /// Advance every coordinator to `now`.
    pub fn tick(&mut self, now: Instant) {
        let host = &mut self.host;
        self.page_exit.tick(now, host.router.as_mut());
        self.split.tick(
            now,
            host.router.as_mut(),
            &self.scroll,
            host.chrome.as_mut(),
        );
        self.shared
            .tick(now, host.router.as_mut(), host.chrome.as_mut());
        self.modal
            .tick(now, host.chrome.as_mut(), host.history.as_mut());
    }

    /// Snapshot for the overlays at `now`.
    #[must_use]
    pub fn frame(&self, now: Instant) -> Frame {
        let modal = self.modal.is_active().then(|| {
            let state = self.modal.state(now);
            let neighbors = state
                .selected
                .as_deref()
                .and_then(|slug| self.gallery.neighbors(slug));
            ModalFrame {
                previous: neighbors.map(|(prev, _)| prev.clone()),
                next: neighbors.map(|(_, next)| next.clone()),
                state,
            }
        });
        let detail = self.shared.frame(now);

        let hidden_thumbnail = self.modal.selected().map(str::to_owned).or_else(
            || {
                detail
                    .as_ref()
                    .filter(|d| {
                        d.direction == Direction::Backward && d.image.is_some()
                    })
                    .map(|d| d.slug.clone())
            },
        );

        Frame {
            is_exiting: self.page_exit.is_exiting(),
            exit_progress: self.page_exit.progress(now),
            split: self.split.panels(now),
            modal,
            detail,
            hidden_thumbnail,
            scroll_suspended: self.scroll.is_suspended(),
        }
    }
}

impl std::fmt::Debug for Choreographer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Choreographer")
            .field("route", &self.route)
            .field("page_exit", &self.page_exit)
            .field("split", &self.split)
            .field("shared", &self.shared)
            .field("modal", &self.modal)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}
