//! The engine's complete interactive vocabulary.
//!
//! Every intent, whether it comes from a click, the router, the browser's
//! history stack or the animation layer, is represented as a [`Command`].
//! Hosts construct commands and pass them to
//! [`Choreographer::execute`](super::Choreographer::execute).

use crate::split_reveal::{SplitPhase, SplitRequest};

/// Which overlay reported a finished animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTarget {
    /// The project modal's morphing image.
    Modal,
    /// The detail page's morphing hero image.
    Detail,
}

/// A discrete operation the engine can perform.
///
/// The engine never cares how a command was triggered:
///
/// ```ignore
/// engine.execute(Command::navigate("/about"), now);
/// engine.execute(Command::OpenModal { slug: "wedding-fm".into() }, now);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Page exit ──
    /// Plain navigation link: play the exit, then change route.
    Navigate {
        /// Destination.
        href: String,
    },

    // ── Router observation ──
    /// The router reports the current pathname.
    RouteChanged {
        /// Pathname now rendered.
        pathname: String,
    },

    // ── Split reveal ──
    /// Start a split-reveal transition.
    StartSplit(SplitRequest),
    /// Consumer-driven phase change, normally `Covering` once the current
    /// page's exit visuals have finished.
    SetSplitPhase(SplitPhase),

    // ── Detail route ──
    /// Gallery thumbnail click that leads to a detail route.
    SelectProject {
        /// Item identifier.
        slug: String,
        /// Image shown during the morph.
        image: String,
        /// Detail route.
        href: String,
    },
    /// The detail page for `slug` mounted.
    MountDetail {
        /// Item identifier.
        slug: String,
    },
    /// Back link on the detail page.
    DetailBack {
        /// Item identifier.
        slug: String,
        /// Gallery route to return to.
        href: String,
    },

    // ── Gallery and modal ──
    /// The gallery mounted with the given query string.
    MountGallery {
        /// `location.search`, with or without the `?`.
        query: String,
    },
    /// Gallery thumbnail click that opens the modal in place.
    OpenModal {
        /// Item identifier.
        slug: String,
    },
    /// Close button or backdrop click.
    CloseModal,
    /// Browser `popstate`.
    PopState,

    // ── Animation layer ──
    /// An overlay finished rendering its running animation.
    AnimationComplete(AnimationTarget),

    // ── Teardown ──
    /// Drop every in-flight transition and release all locks.
    Abort,
}

impl Command {
    /// Shorthand for [`Command::Navigate`].
    #[must_use]
    pub fn navigate(href: &str) -> Self {
        Self::Navigate {
            href: href.to_owned(),
        }
    }

    /// Shorthand for [`Command::RouteChanged`].
    #[must_use]
    pub fn route_changed(pathname: &str) -> Self {
        Self::RouteChanged {
            pathname: pathname.to_owned(),
        }
    }

    /// Short name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::RouteChanged { .. } => "route_changed",
            Self::StartSplit(_) => "start_split",
            Self::SetSplitPhase(_) => "set_split_phase",
            Self::SelectProject { .. } => "select_project",
            Self::MountDetail { .. } => "mount_detail",
            Self::DetailBack { .. } => "detail_back",
            Self::MountGallery { .. } => "mount_gallery",
            Self::OpenModal { .. } => "open_modal",
            Self::CloseModal => "close_modal",
            Self::PopState => "pop_state",
            Self::AnimationComplete(_) => "animation_complete",
            Self::Abort => "abort",
        }
    }

    /// Whether the command starts a transition, as opposed to observing
    /// or advancing one.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            Self::Navigate { .. }
                | Self::StartSplit(_)
                | Self::SelectProject { .. }
                | Self::DetailBack { .. }
                | Self::OpenModal { .. }
        )
    }
}
