//! Target table: where every segment would land from a given rotation

use serde::{Deserialize, Serialize};

use lw_wheel::angle::{normalize360, segment_center};
use lw_wheel::{SegmentCatalog, SpinConfig, TargetRequest, compute_target, max_jitter};

use crate::error::SimResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRow {
    pub index: usize,
    pub id: u32,
    pub label: String,
    /// Segment center in the wheel frame
    pub center: f64,
    /// Wheel orientation that puts the center under the pointer
    pub required_orientation: f64,
    /// Absolute target with zero jitter
    pub final_rotation: f64,
    /// Forward travel from the starting rotation
    pub travel: f64,
}

/// One zero-jitter target per segment, starting from `rotation`
pub fn target_table(
    catalog: &SegmentCatalog,
    config: &SpinConfig,
    rotation: f64,
) -> SimResult<Vec<TargetRow>> {
    catalog
        .iter()
        .map(|(index, segment)| -> SimResult<TargetRow> {
            let request = TargetRequest::new(
                index,
                catalog.len(),
                rotation,
                config.extra_full_turns,
                0.0,
            )
            .with_reference_angle(config.reference_angle)
            .with_safety_margin(config.safety_margin_degrees);
            let target = compute_target(&request)?;

            Ok(TargetRow {
                index,
                id: segment.id,
                label: segment.label.clone(),
                center: segment_center(index, catalog.len()),
                required_orientation: target.required_orientation,
                final_rotation: target.final_rotation,
                travel: target.final_rotation - rotation,
            })
        })
        .collect()
}

/// Plain-text rendering of a target table
pub fn format_table(rows: &[TargetRow], rotation: f64, jitter_limit: f64) -> String {
    let mut output = format!(
        "Targets from {:.2}° (resting at {:.2}°, jitter limit ±{:.2}°)\n",
        rotation,
        normalize360(rotation),
        jitter_limit
    );
    output.push_str(&"-".repeat(72));
    output.push('\n');
    for row in rows {
        output.push_str(&format!(
            "{:>3}  {:<18} center {:>7.2}°  orient {:>7.2}°  final {:>11.2}°  (+{:.2}°)\n",
            row.index, row.label, row.center, row.required_orientation, row.final_rotation, row.travel
        ));
    }
    output
}

/// Usable jitter for a config on this catalog
pub fn jitter_limit(catalog: &SegmentCatalog, config: &SpinConfig) -> f64 {
    max_jitter(catalog.len(), config.safety_margin_degrees).min(config.jitter_degrees)
}
