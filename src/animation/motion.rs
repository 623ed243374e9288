//! Motion describes how long an animation runs and which curve it follows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::easing::EasingFunction;

/// Duration plus easing for one animated phase.
///
/// A phase's motion is the single source of truth for its timing: the
/// overlay renders with it and the coordinator advances the phase when a
/// tween built from it completes.
///
/// Preset constructors: [`page_exit()`](Self::page_exit),
/// [`cover()`](Self::cover), [`split()`](Self::split),
/// [`morph()`](Self::morph), [`content()`](Self::content).
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct Motion {
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Easing curve.
    pub easing: EasingFunction,
}

impl Motion {
    /// Motion with explicit duration and curve.
    #[must_use]
    pub const fn new(duration_ms: u64, easing: EasingFunction) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    /// Uniform page exit (600ms, expo-out).
    #[must_use]
    pub const fn page_exit() -> Self {
        Self::new(600, EasingFunction::EXPO_OUT)
    }

    /// Split-reveal panels closing in (400ms).
    #[must_use]
    pub const fn cover() -> Self {
        Self::new(400, EasingFunction::COVER)
    }

    /// Split-reveal panels parting (1s).
    #[must_use]
    pub const fn split() -> Self {
        Self::new(1000, EasingFunction::SPLIT)
    }

    /// Thumbnail ↔ hero morph (850ms).
    #[must_use]
    pub const fn morph() -> Self {
        Self::new(850, EasingFunction::MORPH)
    }

    /// Content fade-in after a reveal (700ms).
    #[must_use]
    pub const fn content() -> Self {
        Self::new(700, EasingFunction::EXPO_OUT)
    }

    /// Instant change with no animation.
    #[must_use]
    pub const fn snap() -> Self {
        Self::new(0, EasingFunction::Linear)
    }

    /// Duration as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::morph()
    }
}
