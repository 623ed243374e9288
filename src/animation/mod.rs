//! Timing primitives shared by every coordinator.

pub mod easing;
pub mod interval;
pub mod motion;
pub mod tween;

pub use easing::EasingFunction;
pub use interval::Interval;
pub use motion::Motion;
pub use tween::{stagger, RectTween, Tween};
