//! Segment definitions and the segment catalog

use serde::{Deserialize, Serialize};

use crate::angle;
use crate::error::{WheelError, WheelResult};

/// Presentation data carried through the engine untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStyle {
    /// Fill color (e.g. "#1A1A1A")
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub glow_color: Option<String>,
    /// Highlighted prize (rendered with the special treatment)
    #[serde(default)]
    pub special: bool,
}

impl SegmentStyle {
    fn colors(color: &str, text_color: &str, glow_color: &str) -> Self {
        Self {
            color: Some(color.into()),
            text_color: Some(text_color.into()),
            glow_color: Some(glow_color.into()),
            special: false,
        }
    }

    fn highlighted(mut self) -> Self {
        self.special = true;
        self
    }
}

/// One angular slice of the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique, stable segment ID
    pub id: u32,
    /// Display label (e.g. "500 Baht", "ZONK")
    pub label: String,
    /// Relative selection weight (normalized by the selector)
    pub weight: f64,
    /// Landing here means "no prize"
    #[serde(default)]
    pub is_failure: bool,
    #[serde(default)]
    pub style: SegmentStyle,
}

impl Segment {
    /// Create a prize segment
    pub fn prize(id: u32, label: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            label: label.into(),
            weight,
            is_failure: false,
            style: SegmentStyle::default(),
        }
    }

    /// Create a failure ("no prize") segment
    pub fn failure(id: u32, label: impl Into<String>, weight: f64) -> Self {
        Self {
            is_failure: true,
            ..Self::prize(id, label, weight)
        }
    }

    /// Attach presentation data
    pub fn with_style(mut self, style: SegmentStyle) -> Self {
        self.style = style;
        self
    }
}

/// Immutable, ordered list of segments.
///
/// Catalog order defines angular position: segment `i` occupies
/// `[i·Δ, (i+1)·Δ)` with `Δ = 360 / len`. Nothing may reorder it after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCatalog {
    segments: Vec<Segment>,
    total_weight: f64,
}

impl SegmentCatalog {
    /// Minimum number of segments on a wheel
    pub const MIN_SEGMENTS: usize = 2;

    /// Validate and build a catalog
    pub fn new(segments: Vec<Segment>) -> WheelResult<Self> {
        if segments.len() < Self::MIN_SEGMENTS {
            return Err(WheelError::InvalidCatalog(format!(
                "need at least {} segments, got {}",
                Self::MIN_SEGMENTS,
                segments.len()
            )));
        }

        for (i, seg) in segments.iter().enumerate() {
            if !seg.weight.is_finite() || seg.weight < 0.0 {
                return Err(WheelError::InvalidCatalog(format!(
                    "segment {} ('{}') has invalid weight {}",
                    seg.id, seg.label, seg.weight
                )));
            }
            if segments[..i].iter().any(|other| other.id == seg.id) {
                return Err(WheelError::InvalidCatalog(format!(
                    "duplicate segment id {}",
                    seg.id
                )));
            }
        }

        let total_weight: f64 = segments.iter().map(|s| s.weight).sum();
        if total_weight <= 0.0 {
            return Err(WheelError::InvalidCatalog(
                "all segment weights are zero".into(),
            ));
        }

        Ok(Self {
            segments,
            total_weight,
        })
    }

    /// The nine-segment "Lucky Spin" wheel.
    ///
    /// ZONK sits on index 6 with weight 0.85; the eight prizes share the
    /// remaining 0.15 evenly.
    pub fn lucky_spin() -> Self {
        const PRIZE_WEIGHT: f64 = 0.15 / 8.0;
        const DARK: (&str, &str, &str) = ("#1A1A1A", "#F7E7CE", "rgba(247, 231, 206, 0.4)");
        const LIGHT: (&str, &str, &str) = ("#FDFBF7", "#0E0F12", "rgba(212, 175, 55, 0.3)");

        let dark = || SegmentStyle::colors(DARK.0, DARK.1, DARK.2);
        let light = || SegmentStyle::colors(LIGHT.0, LIGHT.1, LIGHT.2);

        let segments = vec![
            Segment::prize(1, "500 Baht", PRIZE_WEIGHT).with_style(dark()),
            Segment::prize(2, "1000 Baht", PRIZE_WEIGHT).with_style(light()),
            Segment::prize(3, "500 Baht", PRIZE_WEIGHT).with_style(dark()),
            Segment::prize(4, "1500 Baht", PRIZE_WEIGHT).with_style(light()),
            Segment::prize(5, "100$ (SPECIAL)", PRIZE_WEIGHT).with_style(
                SegmentStyle::colors("#D4AF37", "#000000", "rgba(255, 255, 255, 0.6)").highlighted(),
            ),
            Segment::prize(6, "2000 Baht", PRIZE_WEIGHT).with_style(light()),
            Segment::failure(7, "ZONK", 0.85).with_style(SegmentStyle::colors(
                "#450a0a",
                "#F7E7CE",
                "rgba(255, 0, 0, 0.3)",
            )),
            Segment::prize(8, "1000 Baht", PRIZE_WEIGHT).with_style(light()),
            Segment::prize(9, "1500 Baht", PRIZE_WEIGHT).with_style(dark()),
        ];

        // Static table, validated by test_lucky_spin_catalog
        Self::from_trusted(segments)
    }

    fn from_trusted(segments: Vec<Segment>) -> Self {
        let total_weight = segments.iter().map(|s| s.weight).sum();
        Self {
            segments,
            total_weight,
        }
    }

    /// Segments in catalog order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a validated catalog
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at catalog index
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Angular width of each segment (Δ)
    pub fn segment_angle(&self) -> f64 {
        angle::segment_angle(self.segments.len())
    }

    /// Index of the segment with `id`
    pub fn index_of_id(&self, id: u32) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    /// Index of the first segment whose label matches (case-insensitive)
    pub fn find_by_label(&self, label: &str) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| s.label.eq_ignore_ascii_case(label))
    }

    /// Index of the first failure segment
    pub fn failure_index(&self) -> Option<usize> {
        self.segments.iter().position(|s| s.is_failure)
    }

    /// Iterate `(index, segment)` in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.segments.iter().enumerate()
    }
}

impl Default for SegmentCatalog {
    fn default() -> Self {
        Self::lucky_spin()
    }
}
