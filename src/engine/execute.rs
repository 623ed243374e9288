//! Command dispatch for the Choreographer.

use web_time::Instant;

use super::{AnimationTarget, Choreographer, Command};
use crate::history::project_param;
use crate::outcome::{IgnoreReason, Outcome};

/// The coordinators that can own the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    PageExit,
    Split,
    Shared,
    Modal,
}

impl Choreographer {
    /// Apply one command. Never fails: an intent that cannot be honored
    /// is ignored with a reason and logged at debug level.
    pub fn execute(&mut self, command: Command, now: Instant) -> Outcome {
        let name = command.name();
        let outcome = self.dispatch(command, now);
        if let Outcome::Ignored(reason) = outcome {
            log::debug!("{name} ignored: {reason:?}");
        }
        outcome
    }

    /// Whether a coordinator other than those in `allowed` is in flight.
    fn blocked(&self, now: Instant, allowed: &[Lane]) -> bool {
        let busy = [
            (Lane::PageExit, self.page_exit.is_exiting()),
            (Lane::Split, self.split.is_transitioning()),
            (Lane::Shared, self.shared.is_busy(now)),
            (Lane::Modal, self.modal.is_active()),
        ];
        busy.iter()
            .any(|(lane, active)| *active && !allowed.contains(lane))
    }

    fn dispatch(&mut self, command: Command, now: Instant) -> Outcome {
        match command {
            Command::Navigate { href } => {
                if self.blocked(now, &[Lane::PageExit, Lane::Modal]) {
                    return Outcome::Ignored(IgnoreReason::Busy);
                }
                self.page_exit
                    .navigate_to(&href, &self.route, now, &self.scroll)
            }
            Command::RouteChanged { pathname } => self.route_changed(pathname),
            Command::StartSplit(request) => {
                if self.blocked(now, &[Lane::Split]) {
                    return Outcome::Ignored(IgnoreReason::Busy);
                }
                let viewport = self.host.rects.viewport();
                self.split.start(request, viewport)
            }
            Command::SetSplitPhase(phase) => {
                match self.split.set_phase(
                    phase,
                    now,
                    &self.scroll,
                    self.host.chrome.as_mut(),
                ) {
                    Ok(()) => Outcome::Accepted,
                    Err(e) => {
                        log::warn!("{e}");
                        Outcome::Ignored(IgnoreReason::SplitPhase)
                    }
                }
            }
            Command::SelectProject { slug, image, href } => {
                if self.blocked(now, &[Lane::Shared]) {
                    return Outcome::Ignored(IgnoreReason::Busy);
                }
                self.shared.select(
                    &slug,
                    &image,
                    &href,
                    now,
                    &*self.host.rects,
                    &self.scroll,
                    self.host.router.as_mut(),
                )
            }
            Command::MountDetail { slug } => self.shared.mount_detail(
                &slug,
                now,
                self.host.rects.viewport(),
                &self.scroll,
                self.host.chrome.as_mut(),
            ),
            Command::DetailBack { slug, href } => {
                if self.blocked(now, &[Lane::Shared]) {
                    return Outcome::Ignored(IgnoreReason::Busy);
                }
                self.shared
                    .detail_back(&slug, &href, now, self.host.rects.viewport())
            }
            Command::MountGallery { query } => {
                let returned = self.shared.mount_gallery(
                    now,
                    &*self.host.rects,
                    &self.scroll,
                    self.host.chrome.as_mut(),
                );
                let opened = if self.is_listed(&query) {
                    self.modal.open_from_url(
                        &query,
                        &self.route,
                        now,
                        &*self.host.rects,
                        &self.scroll,
                        self.host.chrome.as_mut(),
                    )
                } else {
                    log::debug!("deep link {query} names no gallery project");
                    Outcome::Ignored(IgnoreReason::UnknownProject)
                };
                if returned.is_accepted() {
                    returned
                } else {
                    opened
                }
            }
            Command::OpenModal { slug } => {
                if self.blocked(now, &[Lane::Modal]) {
                    return Outcome::Ignored(IgnoreReason::Busy);
                }
                self.modal.open(
                    &slug,
                    &self.route,
                    now,
                    &*self.host.rects,
                    &self.scroll,
                    self.host.chrome.as_mut(),
                    self.host.history.as_mut(),
                )
            }
            Command::CloseModal => self.modal.close(now, &*self.host.rects),
            Command::PopState => {
                self.modal.pop_state(now, &*self.host.rects)
            }
            Command::AnimationComplete(AnimationTarget::Modal) => self
                .modal
                .animation_complete(
                    now,
                    self.host.chrome.as_mut(),
                    self.host.history.as_mut(),
                ),
            Command::AnimationComplete(AnimationTarget::Detail) => self
                .shared
                .animation_complete(now, self.host.chrome.as_mut()),
            Command::Abort => {
                self.abort();
                Outcome::Accepted
            }
        }
    }

    /// Route observer: clears a finished page exit, releases transitions
    /// abandoned by the previous page, and tears down a modal left open
    /// on it.
    fn route_changed(&mut self, pathname: String) -> Outcome {
        if pathname == self.route {
            return Outcome::Ignored(IgnoreReason::SameRoute);
        }
        let previous = std::mem::replace(&mut self.route, pathname);
        log::debug!("route {previous} -> {}", self.route);
        let chrome = self.host.chrome.as_mut();
        let _ = self.page_exit.route_changed(&previous, &self.route);
        self.split.route_changed(chrome);
        self.shared.route_changed(&self.route);
        self.modal.abort(chrome);
        Outcome::Accepted
    }

    /// Whether the `?project=` slug in `query` is one the attached
    /// gallery shows. Without a gallery every slug is taken on trust.
    fn is_listed(&self, query: &str) -> bool {
        project_param(query).is_none_or(|slug| {
            self.gallery.is_empty() || self.gallery.find(slug).is_some()
        })
    }

    fn abort(&mut self) {
        let chrome = self.host.chrome.as_mut();
        self.page_exit.abort();
        self.split.abort(chrome);
        self.shared.abort(chrome);
        self.modal.abort(chrome);
        log::info!("all transitions aborted");
    }
}
