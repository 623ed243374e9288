//! Tweens execute a single timed animation.

use web_time::{Duration, Instant};

use super::easing::EasingFunction;
use super::motion::Motion;
use crate::geometry::Rect;

/// A started animation: a motion pinned to a start instant.
///
/// The start may lie in the future; progress stays at 0.0 until then.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    /// When the animation starts.
    start: Instant,
    /// Total duration.
    duration: Duration,
    /// Easing curve.
    easing: EasingFunction,
}

impl Tween {
    /// Start a tween at `start`.
    #[must_use]
    pub fn new(start: Instant, motion: Motion) -> Self {
        Self {
            start,
            duration: motion.duration(),
            easing: motion.easing,
        }
    }

    /// Start a tween `delay` after `now`.
    #[must_use]
    pub fn delayed(now: Instant, delay: Duration, motion: Motion) -> Self {
        Self::new(now + delay, motion)
    }

    /// Total animation duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Instant at which the tween reports completion.
    #[must_use]
    pub fn end(&self) -> Instant {
        self.start + self.duration
    }

    /// Normalized progress (0.0 to 1.0).
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);

        if self.duration.is_zero() {
            if now >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Eased progress.
    #[must_use]
    pub fn eased(&self, now: Instant) -> f32 {
        self.easing.evaluate(self.progress(now))
    }

    /// Whether the animation has reached completion.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        now >= self.end()
    }
}

/// A tween that moves a rectangle from one place to another.
#[derive(Debug, Clone, Copy)]
pub struct RectTween {
    from: Rect,
    to: Rect,
    tween: Tween,
}

impl RectTween {
    /// Animate `from` → `to` with the given timing.
    #[must_use]
    pub fn new(from: Rect, to: Rect, tween: Tween) -> Self {
        Self { from, to, tween }
    }

    /// Rectangle at progress 0.
    #[must_use]
    pub fn from(&self) -> Rect {
        self.from
    }

    /// Rectangle at progress 1.
    #[must_use]
    pub fn to(&self) -> Rect {
        self.to
    }

    /// Underlying timing.
    #[must_use]
    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Rectangle at a raw (un-eased) progress value.
    #[must_use]
    pub fn at(&self, raw_t: f32) -> Rect {
        self.from
            .lerp(&self.to, self.tween.easing.evaluate(raw_t))
    }

    /// Rectangle to render at `now`.
    #[must_use]
    pub fn sample(&self, now: Instant) -> Rect {
        self.at(self.tween.progress(now))
    }

    /// Whether the rectangle has arrived.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.tween.is_complete(now)
    }
}

/// Delay before the `index`-th element of a staggered group starts.
#[must_use]
pub fn stagger(base: Duration, step: Duration, index: usize) -> Duration {
    base + step * u32::try_from(index).unwrap_or(u32::MAX)
}
