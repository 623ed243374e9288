//! Easing functions for animation interpolation.
//!
//! Besides the closed-form curves, [`EasingFunction::CubicBezier`] follows
//! the CSS `cubic-bezier(x1, y1, x2, y2)` definition so curves tuned in a
//! stylesheet map over unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// CSS cubic Bézier with control points `(x1, y1)` and `(x2, y2)`.
    /// The x coordinates must lie in `[0, 1]`.
    CubicBezier {
        /// First control point x.
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x.
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
}

impl EasingFunction {
    /// Long exponential-style deceleration used for page content.
    pub const EXPO_OUT: Self = Self::bezier(0.22, 1.0, 0.36, 1.0);
    /// Deceleration used when a thumbnail morphs into a hero image.
    pub const MORPH: Self = Self::bezier(0.32, 0.72, 0.0, 1.0);
    /// Standard ease used while split-reveal panels close in.
    pub const COVER: Self = Self::bezier(0.4, 0.0, 0.2, 1.0);
    /// Symmetric ease-in-out used when split-reveal panels part.
    pub const SPLIT: Self = Self::bezier(0.76, 0.0, 0.24, 1.0);

    /// Shorthand for [`EasingFunction::CubicBezier`].
    #[must_use]
    pub const fn bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]. The endpoints map to exactly 0.0
    /// and 1.0 for every variant.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        match *self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicBezier { x1, y1, x2, y2 } => {
                let s = solve_bezier_x(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::MORPH
    }
}

/// One coordinate of a cubic Bézier anchored at 0 and 1:
/// `3(1-s)²s·p1 + 3(1-s)s²·p2 + s³`.
#[inline]
fn bezier_component(s: f32, p1: f32, p2: f32) -> f32 {
    let oms = 1.0 - s;
    3.0 * oms * oms * s * p1 + 3.0 * oms * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let oms = 1.0 - s;
    3.0 * oms * oms * p1 + 6.0 * oms * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Parameter `s` at which the curve's x coordinate equals `x`.
///
/// Newton-Raphson first, bisection when the slope flattens out.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_component(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier_component(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 7] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::EXPO_OUT,
        EasingFunction::MORPH,
        EasingFunction::COVER,
        EasingFunction::SPLIT,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.evaluate(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_input_clamping() {
        for easing in ALL {
            assert_eq!(easing.evaluate(-0.5), 0.0);
            assert_eq!(easing.evaluate(1.5), 1.0);
        }
    }

    #[test]
    fn test_quadratic_in() {
        let quad_in = EasingFunction::QuadraticIn;
        assert_eq!(quad_in.evaluate(0.5), 0.25);
    }

    #[test]
    fn test_quadratic_out() {
        let quad_out = EasingFunction::QuadraticOut;
        assert_eq!(quad_out.evaluate(0.5), 0.75);
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let linear = EasingFunction::bezier(0.25, 0.25, 0.75, 0.75);
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!((linear.evaluate(t) - t).abs() < 1e-4, "t={t}");
        }
    }

    #[test]
    fn test_morph_decelerates() {
        // Deceleration curve: most of the distance is covered early.
        let v = EasingFunction::MORPH.evaluate(0.25);
        assert!(v > 0.5, "expected fast start, got {v}");
    }

    #[test]
    fn test_split_is_symmetric() {
        let split = EasingFunction::SPLIT;
        assert!((split.evaluate(0.5) - 0.5).abs() < 1e-3);
        let a = split.evaluate(0.2);
        let b = split.evaluate(0.8);
        assert!((a + b - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_bezier_curves_are_monotonic() {
        for easing in ALL {
            let mut prev = 0.0_f32;
            for i in 0..=200 {
                let v = easing.evaluate(i as f32 / 200.0);
                assert!(v + 1e-5 >= prev, "{easing:?} dipped at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_default_is_morph() {
        assert_eq!(EasingFunction::default(), EasingFunction::MORPH);
    }

    #[test]
    fn test_round_trips_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrap {
            ease: EasingFunction,
        }
        let text = toml::to_string(&Wrap {
            ease: EasingFunction::COVER,
        })
        .unwrap();
        let back: Wrap = toml::from_str(&text).unwrap();
        assert_eq!(back.ease, EasingFunction::COVER);
    }
}
