//! Wheel configuration
//!
//! Spin presentation constants (turns, duration, jitter, easing) and the
//! catalog + cooldown document loaded from JSON or YAML.

use serde::{Deserialize, Serialize};

use crate::angle;
use crate::easing::SpinEasing;
use crate::error::{WheelError, WheelResult};
use crate::gate::{DEFAULT_COOLDOWN_MS, EligibilityGate};
use crate::segment::{Segment, SegmentCatalog};
use crate::target::{DEFAULT_REFERENCE_ANGLE, DEFAULT_SAFETY_MARGIN};

/// Spin presentation profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinProfile {
    /// Long 10 second spin with many turns
    #[default]
    Dramatic,
    /// Short spin for repeat play
    Quick,
    /// Instant (completes on the first tick, for testing)
    Studio,
    /// Hand-tuned values
    Custom,
}

/// Spin animation and targeting constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub profile: SpinProfile,

    /// Minimum forward full turns before aligning
    pub extra_full_turns: u32,

    /// Animation length (ms)
    pub duration_ms: u64,

    /// Max jitter magnitude; actual jitter is uniform in ±this
    pub jitter_degrees: f64,

    /// ε kept between the landing point and a segment edge
    pub safety_margin_degrees: f64,

    /// Pointer angle in the wheel's un-rotated frame
    pub reference_angle: f64,

    pub easing: SpinEasing,
}

impl SpinConfig {
    /// 15 turns over 10 seconds
    pub fn dramatic() -> Self {
        Self {
            profile: SpinProfile::Dramatic,
            extra_full_turns: 15,
            duration_ms: 10_000,
            jitter_degrees: 0.2,
            safety_margin_degrees: DEFAULT_SAFETY_MARGIN,
            reference_angle: DEFAULT_REFERENCE_ANGLE,
            easing: SpinEasing::dramatic(),
        }
    }

    /// Quick mode
    pub fn quick() -> Self {
        Self {
            profile: SpinProfile::Quick,
            extra_full_turns: 6,
            duration_ms: 4_000,
            easing: SpinEasing::EaseOutQuart,
            ..Self::dramatic()
        }
    }

    /// Studio mode
    pub fn studio() -> Self {
        Self {
            profile: SpinProfile::Studio,
            extra_full_turns: 1,
            duration_ms: 0,
            easing: SpinEasing::Linear,
            ..Self::dramatic()
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: SpinProfile) -> Self {
        match profile {
            SpinProfile::Dramatic => Self::dramatic(),
            SpinProfile::Quick => Self::quick(),
            SpinProfile::Studio => Self::studio(),
            SpinProfile::Custom => Self::dramatic(),
        }
    }

    /// Scale duration by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        Self {
            profile: SpinProfile::Custom,
            duration_ms: (self.duration_ms as f64 * factor).round() as u64,
            ..self.clone()
        }
    }

    pub fn with_easing(mut self, easing: SpinEasing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_extra_full_turns(mut self, turns: u32) -> Self {
        self.extra_full_turns = turns;
        self
    }

    pub fn with_jitter(mut self, jitter_degrees: f64) -> Self {
        self.jitter_degrees = jitter_degrees;
        self
    }

    /// Validate against a wheel with `segment_count` segments
    pub fn validate(&self, segment_count: usize) -> WheelResult<()> {
        for (name, value) in [
            ("jitter_degrees", self.jitter_degrees),
            ("safety_margin_degrees", self.safety_margin_degrees),
            ("reference_angle", self.reference_angle),
        ] {
            if !value.is_finite() {
                return Err(WheelError::InvalidConfig(format!("{name} is not finite")));
            }
        }
        if self.jitter_degrees < 0.0 {
            return Err(WheelError::InvalidConfig(
                "jitter_degrees must be >= 0".into(),
            ));
        }
        if self.safety_margin_degrees < 0.0 {
            return Err(WheelError::InvalidConfig(
                "safety_margin_degrees must be >= 0".into(),
            ));
        }
        if segment_count >= SegmentCatalog::MIN_SEGMENTS {
            let half = angle::segment_angle(segment_count) / 2.0;
            if self.safety_margin_degrees >= half {
                return Err(WheelError::InvalidConfig(format!(
                    "safety margin {}° leaves no room inside {}° segments",
                    self.safety_margin_degrees,
                    half * 2.0
                )));
            }
        }
        if !self.easing.is_valid() {
            return Err(WheelError::InvalidConfig(format!(
                "easing {:?} has control points outside [0, 1]",
                self.easing
            )));
        }
        Ok(())
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::dramatic()
    }
}

/// Complete wheel document: catalog, spin constants, cooldown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub spin: SpinConfig,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

impl WheelConfig {
    /// The product wheel with default spin constants
    pub fn lucky_spin() -> Self {
        Self {
            segments: SegmentCatalog::lucky_spin().segments().to_vec(),
            spin: SpinConfig::default(),
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> WheelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml(yaml: &str) -> WheelResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse by file extension (`.yaml`/`.yml`, anything else as JSON)
    pub fn from_str_with_extension(text: &str, extension: &str) -> WheelResult<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml(text),
            _ => Self::from_json(text),
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> WheelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> WheelResult<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Validate catalog and spin constants together
    pub fn validate(&self) -> WheelResult<()> {
        SegmentCatalog::new(self.segments.clone())?;
        self.spin.validate(self.segments.len())
    }

    /// Build the validated catalog
    pub fn catalog(&self) -> WheelResult<SegmentCatalog> {
        SegmentCatalog::new(self.segments.clone())
    }

    /// Cooldown policy
    pub fn gate(&self) -> EligibilityGate {
        EligibilityGate::new(self.cooldown_ms)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::lucky_spin()
    }
}
