//! Rotation targeting
//!
//! Converts a selected segment into the absolute rotation the wheel has to
//! reach so that the segment's center (plus jitter) sits under the pointer.
//!
//! ```text
//! Δ            = 360 / n
//! center_i     = i·Δ + Δ/2
//! required     = norm(reference − center_i)
//! align        = norm(required − norm(current))
//! final        = current + turns·360 + align + jitter
//! ```

use serde::{Deserialize, Serialize};

use crate::angle::{self, FULL_TURN, normalize360};
use crate::error::{WheelError, WheelResult};

/// Pointer position in the wheel's un-rotated frame (top of the wheel)
pub const DEFAULT_REFERENCE_ANGLE: f64 = 0.0;

/// Default safety margin kept between a landing angle and a segment edge
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.5;

/// Extra clearance so a fully clamped landing sits strictly inside the margin
const MARGIN_CLEARANCE: f64 = 1e-6;

/// Inputs for one target computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRequest {
    pub segment_index: usize,
    pub segment_count: usize,
    /// Unbounded cumulative rotation before the spin
    pub current_rotation: f64,
    /// Minimum forward full turns
    pub extra_full_turns: u32,
    /// Requested jitter, clamped to the segment interior
    pub jitter_degrees: f64,
    pub reference_angle: f64,
    /// ε: minimum distance from the landing point to a segment edge
    pub safety_margin: f64,
}

impl TargetRequest {
    /// Request with default pointer and margin
    pub fn new(
        segment_index: usize,
        segment_count: usize,
        current_rotation: f64,
        extra_full_turns: u32,
        jitter_degrees: f64,
    ) -> Self {
        Self {
            segment_index,
            segment_count,
            current_rotation,
            extra_full_turns,
            jitter_degrees,
            reference_angle: DEFAULT_REFERENCE_ANGLE,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }

    pub fn with_reference_angle(mut self, reference_angle: f64) -> Self {
        self.reference_angle = reference_angle;
        self
    }

    pub fn with_safety_margin(mut self, safety_margin: f64) -> Self {
        self.safety_margin = safety_margin;
        self
    }
}

/// Result of a target computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationTarget {
    /// Absolute rotation to animate to
    pub final_rotation: f64,
    /// Orientation (mod 360) that centers the segment under the pointer
    pub required_orientation: f64,
    /// Forward rotation needed on top of the full turns
    pub delta_to_align: f64,
    /// Jitter actually applied after clamping
    pub applied_jitter: f64,
}

/// Largest jitter that keeps the landing point more than `margin` away from
/// both edges
#[inline]
pub fn max_jitter(segment_count: usize, margin: f64) -> f64 {
    (angle::segment_angle(segment_count) / 2.0 - margin - MARGIN_CLEARANCE).max(0.0)
}

fn check_segment_count(segment_count: usize) -> WheelResult<()> {
    if segment_count < 2 {
        return Err(WheelError::InvalidInput(format!(
            "segment count {segment_count} below 2"
        )));
    }
    Ok(())
}

/// Compute the absolute target rotation for a segment.
pub fn compute_target(req: &TargetRequest) -> WheelResult<RotationTarget> {
    check_segment_count(req.segment_count)?;
    if req.segment_index >= req.segment_count {
        return Err(WheelError::InvalidInput(format!(
            "segment index {} out of range (0..{})",
            req.segment_index, req.segment_count
        )));
    }
    for (name, value) in [
        ("current rotation", req.current_rotation),
        ("jitter", req.jitter_degrees),
        ("reference angle", req.reference_angle),
        ("safety margin", req.safety_margin),
    ] {
        if !value.is_finite() {
            return Err(WheelError::InvalidInput(format!("{name} is not finite")));
        }
    }
    if req.safety_margin < 0.0 {
        return Err(WheelError::InvalidInput("safety margin is negative".into()));
    }

    let center = angle::segment_center(req.segment_index, req.segment_count);
    let required_orientation = normalize360(req.reference_angle - center);
    let delta_to_align =
        normalize360(required_orientation - normalize360(req.current_rotation));

    let limit = max_jitter(req.segment_count, req.safety_margin);
    let applied_jitter = req.jitter_degrees.clamp(-limit, limit);

    let mut travel = f64::from(req.extra_full_turns) * FULL_TURN + delta_to_align + applied_jitter;
    // Only reachable with zero extra turns: never stand still or move backward
    while travel <= 0.0 {
        travel += FULL_TURN;
    }

    Ok(RotationTarget {
        final_rotation: req.current_rotation + travel,
        required_orientation,
        delta_to_align,
        applied_jitter,
    })
}

/// Segment index shown under the pointer at `rotation`.
pub fn segment_under_pointer(
    rotation: f64,
    segment_count: usize,
    reference_angle: f64,
) -> WheelResult<usize> {
    check_segment_count(segment_count)?;
    if !rotation.is_finite() || !reference_angle.is_finite() {
        return Err(WheelError::InvalidInput("rotation is not finite".into()));
    }
    let wheel_angle = normalize360(reference_angle - rotation);
    let index = (wheel_angle / angle::segment_angle(segment_count)).floor() as usize;
    Ok(index.min(segment_count - 1))
}

/// Signed offset between the landing point and the segment's center,
/// measured in the wheel's frame.
pub fn landing_offset(
    rotation: f64,
    segment_index: usize,
    segment_count: usize,
    reference_angle: f64,
) -> f64 {
    let under_pointer = normalize360(reference_angle - rotation);
    angle::shortest_delta(
        angle::segment_center(segment_index, segment_count),
        under_pointer,
    )
}
