//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use servotrack_control::ControllerParams;
use servotrack_link::LinkParams;
use servotrack_vision::{ColorTable, TargetSelectorParams};

/// Perception-stage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerceptionParams {
    /// Named color to segment; must exist in the color table.
    pub color: String,
    /// Gaussian pre-blur applied to each frame before masking.
    pub blur_sigma: f32,
    /// Vertical position of the reference row, as a fraction of frame
    /// height. The robot drives the target's bottom edge onto this row.
    pub reference_row_fraction: f32,
    pub selector: TargetSelectorParams,
}

impl Default for PerceptionParams {
    fn default() -> Self {
        Self {
            color: "green".to_string(),
            blur_sigma: 1.5,
            reference_row_fraction: 0.8,
            selector: TargetSelectorParams::default(),
        }
    }
}

/// Everything one navigation run needs, loadable from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub perception: PerceptionParams,
    #[serde(default)]
    pub controller: ControllerParams,
    #[serde(default)]
    pub link: LinkParams,
    /// Nominal frame period; doubles as the PID timestep. Zero disables
    /// pacing (useful when the source itself paces, or in tests).
    #[serde(default = "default_frame_interval")]
    pub frame_interval: Duration,
    /// Color name -> HSV interval table; defaults to the built-in set.
    #[serde(default = "ColorTable::builtin")]
    pub colors: ColorTable,
}

fn default_frame_interval() -> Duration {
    Duration::from_millis(100)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            perception: PerceptionParams::default(),
            controller: ControllerParams::default(),
            link: LinkParams::default(),
            frame_interval: default_frame_interval(),
            colors: ColorTable::builtin(),
        }
    }
}
