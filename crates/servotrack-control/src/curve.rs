//! Deadzone-and-curve effort mapping.
//!
//! An alternative to PID for discrete-move variants: normalizes the offset,
//! applies a power curve for finer control near the setpoint, and maps the
//! result into a bounded speed range.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EffortCurve {
    /// Offsets with magnitude below this produce zero effort.
    pub deadzone: f32,
    /// Offset magnitude that maps to `max_output`.
    pub max_input: f32,
    pub min_output: f32,
    pub max_output: f32,
    /// Curve exponent; 2.0 gives the quadratic response the workshop robots
    /// were tuned with.
    pub exponent: f32,
}

impl Default for EffortCurve {
    fn default() -> Self {
        Self {
            deadzone: 20.0,
            max_input: 320.0,
            min_output: 5.0,
            max_output: 70.0,
            exponent: 2.0,
        }
    }
}

impl EffortCurve {
    /// Map a signed offset to a signed effort.
    pub fn map(&self, offset: f32) -> f32 {
        if offset.abs() < self.deadzone {
            return 0.0;
        }
        if self.max_input <= 0.0 {
            return 0.0;
        }

        let normalized = (offset.abs() / self.max_input).min(1.0);
        let curved = normalized.powf(self.exponent);
        let magnitude =
            (self.min_output + (self.max_output - self.min_output) * curved).min(self.max_output);
        magnitude.copysign(offset)
    }
}
