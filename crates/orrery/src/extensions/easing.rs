// extensions/easing.rs
//
// Pure easing functions for camera and UI interpolation.
// No dependencies on the scene graph.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a normalized time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    Linear,
    /// Hermite smoothstep `t²(3 − 2t)`: zero velocity at both ends.
    #[default]
    SmoothStep,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow start and end.
    CubicInOut,
    /// Slow end.
    CubicOut,
    /// Sine wave easing (smooth).
    SineInOut,
}

impl Easing {
    /// Apply the easing function to `t`, clamped to [0, 1].
    /// Every curve here maps 0 → 0 and 1 → 1 and is non-decreasing.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => smoothstep(t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// `t²(3 − 2t)` on an already-clamped `t`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two points.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate points with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    lerp_vec3(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::QuadInOut,
        Easing::CubicInOut,
        Easing::CubicOut,
        Easing::SineInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?} at 1");
        }
    }

    #[test]
    fn smoothstep_midpoint_is_half() {
        assert_eq!(Easing::SmoothStep.apply(0.5), 0.5);
        assert_eq!(smoothstep(0.25), 0.15625);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Easing::SmoothStep.apply(-3.0), 0.0);
        assert_eq!(Easing::SmoothStep.apply(7.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 1.0);
    }

    #[test]
    fn ease_vec3_interpolates() {
        let p = ease_vec3(Vec3::new(0.0, 0.0, 70.0), Vec3::new(0.0, 10.0, 35.0), 0.5, Easing::SmoothStep);
        assert_eq!(p, Vec3::new(0.0, 5.0, 52.5));
        assert!((ease(100.0, 200.0, 0.5, Easing::Linear) - 150.0).abs() < 1e-4);
    }

    #[test]
    fn parses_snake_case_names() {
        let e: Easing = serde_json::from_str("\"cubic_in_out\"").unwrap();
        assert_eq!(e, Easing::CubicInOut);
        assert_eq!(Easing::default(), Easing::SmoothStep);
    }

    proptest! {
        /// Sampling at increasing times never goes backwards and stays in [0, 1].
        #[test]
        fn prop_monotone_in_unit_interval(a in 0.0f32..=1.0, b in 0.0f32..=1.0, idx in 0usize..6) {
            let e = ALL[idx];
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (ea, eb) = (e.apply(lo), e.apply(hi));
            prop_assert!((0.0..=1.0 + 1e-6).contains(&ea));
            prop_assert!((0.0..=1.0 + 1e-6).contains(&eb));
            prop_assert!(eb + 1e-6 >= ea, "{:?}: {} -> {}, {} -> {}", e, lo, ea, hi, eb);
        }
    }
}
