//! Closed-loop control for driving a differential-drive robot onto a
//! visually detected target.
//!
//! The navigation controller is a deadzone state machine over two pixel
//! offsets, with an optional IMU heading-hold loop for straight-line
//! approaches. All loops are plain PID evaluations with clamped output.

mod curve;
mod nav;
mod pid;

pub use curve::EffortCurve;
pub use nav::{Controller, ControllerParams, Effort, Offsets, Phase, StepOutput};
pub use pid::{Pid, PidConfig};
