use crate::foundation::{
    core::ValueRange,
    error::{PosterError, PosterResult},
};

/// Upper bound on instances per layer. Larger counts fail validation and are capped when
/// planning.
pub const MAX_OVERLAY_INSTANCES: usize = 1024;

/// Per-instance overrides. Any field left unset falls back to randomized or default geometry.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstanceOverride {
    /// Asset file name (or stem) to use instead of the drawn one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

/// One overlay stamping pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayLayer {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Requested instance count; floored and clamped to `>= 0`.
    #[serde(default)]
    pub count: f64,
    #[serde(default)]
    pub positions: Vec<Option<InstanceOverride>>,
    #[serde(default)]
    pub randomize: bool,
    #[serde(default = "unit_range")]
    pub scale: ValueRange,
    /// Degrees.
    #[serde(default = "zero_range")]
    pub rotation: ValueRange,
    #[serde(default = "unit_range")]
    pub alpha: ValueRange,
}

fn default_enabled() -> bool {
    true
}

fn unit_range() -> ValueRange {
    ValueRange::fixed(1.0)
}

fn zero_range() -> ValueRange {
    ValueRange::fixed(0.0)
}

impl Default for OverlayLayer {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 0.0,
            positions: Vec::new(),
            randomize: false,
            scale: unit_range(),
            rotation: zero_range(),
            alpha: unit_range(),
        }
    }
}

impl OverlayLayer {
    /// Number of instances to place: `max(0, floor(count))`, with non-finite counts as 0,
    /// capped at [`MAX_OVERLAY_INSTANCES`].
    pub fn instance_count(&self) -> usize {
        if !self.count.is_finite() {
            return 0;
        }
        (self.count.floor().max(0.0) as usize).min(MAX_OVERLAY_INSTANCES)
    }

    pub fn override_for(&self, index: usize) -> Option<&InstanceOverride> {
        self.positions.get(index).and_then(Option::as_ref)
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.count.is_finite() && self.count.floor() > MAX_OVERLAY_INSTANCES as f64 {
            return Err(PosterError::validation(format!(
                "overlay count must be <= {MAX_OVERLAY_INSTANCES}, got {}",
                self.count
            )));
        }
        for (name, range) in [
            ("scale", self.scale),
            ("rotation", self.rotation),
            ("alpha", self.alpha),
        ] {
            if !range.is_valid() {
                return Err(PosterError::validation(format!(
                    "overlay {name} range must be finite with min <= max"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/layer.rs"]
mod tests;
