//! Spin easing curves
//!
//! Maps elapsed-time fraction to rotation fraction. Every curve is monotonic
//! non-decreasing on `[0, 1]` with exact endpoints, so the wheel never moves
//! backward and always stops exactly on its target.

use serde::{Deserialize, Serialize};

/// Easing curve for the spin animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinEasing {
    /// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Slow start, fast middle, decelerating finish
    EaseInOutCubic,
    /// Fast start, long deceleration
    EaseOutQuart,
    /// Constant angular velocity
    Linear,
}

impl Default for SpinEasing {
    fn default() -> Self {
        Self::dramatic()
    }
}

impl SpinEasing {
    /// The long dramatic finish used by the product wheel
    pub const fn dramatic() -> Self {
        Self::CubicBezier {
            x1: 0.12,
            y1: 0.72,
            x2: 0.08,
            y2: 1.0,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            SpinEasing::CubicBezier { .. } => "CubicBezier",
            SpinEasing::EaseInOutCubic => "EaseInOutCubic",
            SpinEasing::EaseOutQuart => "EaseOutQuart",
            SpinEasing::Linear => "Linear",
        }
    }

    /// Bezier x control points must stay in [0, 1] for x(t) to be invertible
    pub fn is_valid(&self) -> bool {
        match *self {
            SpinEasing::CubicBezier { x1, y1, x2, y2 } => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
            }
            _ => true,
        }
    }

    /// Evaluate at time fraction `t` (clamped to 0.0 - 1.0)
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }

        match *self {
            SpinEasing::CubicBezier { x1, y1, x2, y2 } => {
                UnitBezier::new(x1, y1, x2, y2).solve(t)
            }

            SpinEasing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            // y = 1 − (1 − t)^4
            SpinEasing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),

            SpinEasing::Linear => t,
        }
    }

    /// Slope dy/dt at `t`, by central difference
    pub fn slope(&self, t: f64) -> f64 {
        const H: f64 = 1e-4;
        let lo = (t - H).max(0.0);
        let hi = (t + H).min(1.0);
        if hi <= lo {
            return 0.0;
        }
        (self.evaluate(hi) - self.evaluate(lo)) / (hi - lo)
    }
}

/// Cubic bezier with fixed endpoints (0,0) and (1,1), solved for x → y
#[derive(Debug, Clone, Copy)]
struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl UnitBezier {
    const EPSILON: f64 = 1e-9;

    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    #[inline]
    fn sample_x(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    #[inline]
    fn sample_y(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    #[inline]
    fn sample_dx(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Curve parameter s with x(s) = x
    fn solve_s(&self, x: f64) -> f64 {
        // Newton first, it converges in a handful of steps away from flat spots
        let mut s = x;
        for _ in 0..8 {
            let err = self.sample_x(s) - x;
            if err.abs() < Self::EPSILON {
                return s;
            }
            let d = self.sample_dx(s);
            if d.abs() < 1e-12 {
                break;
            }
            s -= err / d;
        }

        // Bisection fallback
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while hi - lo > Self::EPSILON {
            let v = self.sample_x(s);
            if (v - x).abs() < Self::EPSILON {
                return s;
            }
            if x > v {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    fn solve(&self, x: f64) -> f64 {
        self.sample_y(self.solve_s(x)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [SpinEasing; 4] = [
        SpinEasing::dramatic(),
        SpinEasing::EaseInOutCubic,
        SpinEasing::EaseOutQuart,
        SpinEasing::Linear,
    ];

    #[test]
    fn test_curve_boundaries() {
        for curve in ALL {
            assert_eq!(curve.evaluate(0.0), 0.0, "{:?} at 0.0", curve);
            assert_eq!(curve.evaluate(1.0), 1.0, "{:?} at 1.0", curve);
            assert_eq!(curve.evaluate(-3.0), 0.0);
            assert_eq!(curve.evaluate(7.0), 1.0);

            let mid = curve.evaluate(0.5);
            assert!(mid > 0.0 && mid < 1.0, "{:?} at 0.5 = {}", curve, mid);
        }
    }

    #[test]
    fn test_curve_monotonic() {
        for curve in ALL {
            let mut prev = 0.0;
            for i in 0..=1000 {
                let v = curve.evaluate(i as f64 / 1000.0);
                assert!(v >= prev - 1e-9, "{:?} not monotonic at {}", curve, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_bezier_linear_equivalence() {
        // Control points on the diagonal give y = x
        let diag = SpinEasing::CubicBezier {
            x1: 1.0 / 3.0,
            y1: 1.0 / 3.0,
            x2: 2.0 / 3.0,
            y2: 2.0 / 3.0,
        };
        for i in 1..10 {
            let t = i as f64 / 10.0;
            assert_abs_diff_eq!(diag.evaluate(t), t, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_dramatic_curve_shape() {
        let curve = SpinEasing::dramatic();
        // Most of the travel is covered early, the rest is a long crawl
        assert!(curve.evaluate(0.25) > 0.6);
        assert!(curve.evaluate(0.9) > 0.99);
        assert!(curve.slope(0.95) < curve.slope(0.1));
    }

    #[test]
    fn test_in_out_cubic_shape() {
        let curve = SpinEasing::EaseInOutCubic;
        assert_abs_diff_eq!(curve.evaluate(0.5), 0.5, epsilon = 1e-12);
        assert!(curve.slope(0.5) > curve.slope(0.05));
        assert!(curve.slope(0.5) > curve.slope(0.95));
    }

    #[test]
    fn test_validity() {
        assert!(SpinEasing::dramatic().is_valid());
        let bad = SpinEasing::CubicBezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0,
        };
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&SpinEasing::EaseOutQuart).unwrap();
        assert_eq!(json, r#"{"type":"ease_out_quart"}"#);
        let back: SpinEasing = serde_json::from_str(
            r#"{"type":"cubic_bezier","x1":0.1,"y1":0.7,"x2":0.1,"y2":1.0}"#,
        )
        .unwrap();
        assert_eq!(back.name(), "CubicBezier");
    }
}
