//! Angle helpers
//!
//! All angles are `f64` degrees. Rotation is stored unbounded; these helpers are
//! only used where two orientations have to be compared.

/// Degrees in one full turn
pub const FULL_TURN: f64 = 360.0;

/// Reduce an angle into `[0, 360)`.
#[inline]
pub fn normalize360(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= FULL_TURN { 0.0 } else { r }
}

/// Angular width of one segment (Δ)
#[inline]
pub fn segment_angle(segment_count: usize) -> f64 {
    FULL_TURN / segment_count as f64
}

/// Angular center of segment `index` in the wheel's own frame
#[inline]
pub fn segment_center(index: usize, segment_count: usize) -> f64 {
    let delta = segment_angle(segment_count);
    index as f64 * delta + delta / 2.0
}

/// Half-open span `[start, end)` of segment `index`
#[inline]
pub fn segment_span(index: usize, segment_count: usize) -> (f64, f64) {
    let delta = segment_angle(segment_count);
    (index as f64 * delta, (index + 1) as f64 * delta)
}

/// Signed shortest distance from `from` to `to`, in `(-180, 180]`
#[inline]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let d = normalize360(to - from);
    if d > FULL_TURN / 2.0 { d - FULL_TURN } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_range() {
        for raw in [-1080.5, -360.0, -0.25, 0.0, 12.0, 359.999, 360.0, 7265.0] {
            let n = normalize360(raw);
            assert!((0.0..360.0).contains(&n), "{raw} -> {n}");
        }
        assert_relative_eq!(normalize360(-260.0), 100.0);
        assert_relative_eq!(normalize360(725.0), 5.0);
        assert_eq!(normalize360(-1e-20), 0.0);
    }

    #[test]
    fn test_segment_geometry() {
        assert_relative_eq!(segment_angle(9), 40.0);
        assert_relative_eq!(segment_center(6, 9), 260.0);
        let (start, end) = segment_span(6, 9);
        assert_relative_eq!(start, 240.0);
        assert_relative_eq!(end, 280.0);
    }

    #[test]
    fn test_shortest_delta() {
        assert_relative_eq!(shortest_delta(350.0, 10.0), 20.0);
        assert_relative_eq!(shortest_delta(10.0, 350.0), -20.0);
        assert_relative_eq!(shortest_delta(0.0, 180.0), 180.0);
    }
}
