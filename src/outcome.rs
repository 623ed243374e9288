//! Result of handing an intent to a coordinator.
//!
//! Intents never fail loudly: a request that cannot be honored is
//! ignored with a reason and the page stays usable.

/// Whether a coordinator acted on an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The intent started or advanced a transition.
    Accepted,
    /// The intent was dropped without side effects.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Whether the intent was acted on.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Why an intent was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A page exit is already in flight.
    AlreadyExiting,
    /// The destination is the current route.
    SameRoute,
    /// Another transition owns the screen.
    Busy,
    /// The thumbnail to morph from is not mounted.
    NoThumbnail,
    /// The modal is not in a phase that accepts this intent.
    ModalPhase,
    /// The split-reveal is not in a phase that accepts this intent.
    SplitPhase,
    /// No pending transition request matches.
    NoRequest,
    /// The linked project is not in the gallery.
    UnknownProject,
    /// The animation that was reported complete is not running.
    NotAnimating,
}
