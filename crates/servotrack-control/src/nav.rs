//! The navigation state machine.
//!
//! Per frame the controller is keyed on target presence and the two pixel
//! offsets against their deadzones. Exactly one loop is authoritative per
//! axis at any time; loops that are not authoritative are reset so stale
//! integral error can never leak into a later active period.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::pid::{Pid, PidConfig};

/// Navigation tunables.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ControllerParams {
    /// Horizontal pixel offsets with magnitude above this trigger turning.
    pub turn_deadzone: f32,
    /// Vertical pixel offsets with magnitude above this trigger approach.
    pub distance_deadzone: f32,
    /// Consecutive aligned frames required before declaring success; rejects
    /// one-frame noise.
    pub aligned_frames_threshold: u32,
    /// Consecutive frames without a target before the search spin engages;
    /// brief dropouts hold still instead.
    pub lost_frames_threshold: u32,
    /// Fixed spin effort while searching.
    pub search_turn_effort: f32,
    pub turn: PidConfig,
    pub distance: PidConfig,
    /// Enables the IMU heading-hold loop during approaches.
    pub heading_hold: Option<PidConfig>,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            turn_deadzone: 40.0,
            distance_deadzone: 20.0,
            aligned_frames_threshold: 10,
            lost_frames_threshold: 5,
            search_turn_effort: 0.5,
            turn: PidConfig::default(),
            distance: PidConfig::default(),
            heading_hold: None,
        }
    }
}

/// Pixel offsets of the selected target from the control reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offsets {
    pub x: f32,
    pub y: f32,
}

/// Arcade-style effort pair. Positive turn steers toward positive x offset;
/// the drive layer owns handedness.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Effort {
    pub throttle: f32,
    pub turn: f32,
}

impl Effort {
    pub const STOP: Effort = Effort {
        throttle: 0.0,
        turn: 0.0,
    };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Searching,
    Turning,
    Approaching,
    Aligned,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutput {
    pub phase: Phase,
    pub effort: Effort,
}

/// Deadzone state machine with per-axis PID loops.
#[derive(Clone, Debug)]
pub struct Controller {
    params: ControllerParams,
    turn_pid: Pid,
    distance_pid: Pid,
    heading_pid: Option<Pid>,
    aligned_frames: u32,
    lost_frames: u32,
    heading_setpoint: Option<f32>,
    done: bool,
}

impl Controller {
    pub fn new(params: ControllerParams) -> Self {
        Self {
            turn_pid: Pid::new(params.turn),
            distance_pid: Pid::new(params.distance),
            heading_pid: params.heading_hold.map(Pid::new),
            aligned_frames: 0,
            lost_frames: 0,
            heading_setpoint: None,
            done: false,
            params,
        }
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance one frame.
    ///
    /// `heading` is the latest IMU yaw in degrees, if any; without the
    /// heading-hold loop (or without samples) approaches are vision-only.
    pub fn step(&mut self, target: Option<Offsets>, heading: Option<f32>, dt: f32) -> StepOutput {
        if self.done {
            return StepOutput {
                phase: Phase::Done,
                effort: Effort::STOP,
            };
        }

        let Some(offsets) = target else {
            return self.step_lost();
        };
        self.lost_frames = 0;

        if offsets.x.abs() > self.params.turn_deadzone {
            self.step_turning(offsets, heading, dt)
        } else if offsets.y.abs() > self.params.distance_deadzone {
            self.step_approaching(offsets, heading, dt)
        } else {
            self.step_aligned()
        }
    }

    fn step_lost(&mut self) -> StepOutput {
        self.aligned_frames = 0;
        self.reset_loops();
        self.lost_frames = self.lost_frames.saturating_add(1);

        let effort = if self.lost_frames >= self.params.lost_frames_threshold {
            Effort {
                throttle: 0.0,
                turn: self.params.search_turn_effort,
            }
        } else {
            // Debounce: hold still through brief dropouts before spinning.
            Effort::STOP
        };
        StepOutput {
            phase: Phase::Searching,
            effort,
        }
    }

    fn step_turning(&mut self, offsets: Offsets, heading: Option<f32>, dt: f32) -> StepOutput {
        self.aligned_frames = 0;
        self.distance_pid.reset();

        // Re-latch the hold setpoint so heading correction never fights an
        // intentional turn.
        if let Some(yaw) = heading {
            self.heading_setpoint = Some(yaw);
        }
        if let Some(pid) = &mut self.heading_pid {
            pid.reset();
        }

        let turn = self.turn_pid.update(offsets.x, dt);
        debug!("turning: offset_x {:+.1} -> turn {:+.3}", offsets.x, turn);
        StepOutput {
            phase: Phase::Turning,
            effort: Effort {
                throttle: 0.0,
                turn,
            },
        }
    }

    fn step_approaching(&mut self, offsets: Offsets, heading: Option<f32>, dt: f32) -> StepOutput {
        self.aligned_frames = 0;
        self.turn_pid.reset();

        let throttle = self.distance_pid.update(offsets.y, dt);
        let turn = match (&mut self.heading_pid, heading) {
            (Some(pid), Some(yaw)) => {
                // An approach without a prior turn latches the current yaw.
                let setpoint = *self.heading_setpoint.get_or_insert(yaw);
                pid.update(angle_error_deg(setpoint, yaw), dt)
            }
            _ => 0.0,
        };

        debug!(
            "approaching: offset_y {:+.1} -> throttle {:+.3}, hold turn {:+.3}",
            offsets.y, throttle, turn
        );
        StepOutput {
            phase: Phase::Approaching,
            effort: Effort { throttle, turn },
        }
    }

    fn step_aligned(&mut self) -> StepOutput {
        self.reset_loops();
        self.aligned_frames += 1;

        if self.aligned_frames >= self.params.aligned_frames_threshold {
            info!(
                "aligned for {} consecutive frames, navigation complete",
                self.aligned_frames
            );
            self.done = true;
            return StepOutput {
                phase: Phase::Done,
                effort: Effort::STOP,
            };
        }

        debug!(
            "aligned {}/{}",
            self.aligned_frames, self.params.aligned_frames_threshold
        );
        StepOutput {
            phase: Phase::Aligned,
            effort: Effort::STOP,
        }
    }

    fn reset_loops(&mut self) {
        self.turn_pid.reset();
        self.distance_pid.reset();
        if let Some(pid) = &mut self.heading_pid {
            pid.reset();
        }
    }
}

/// Shortest signed angular difference `setpoint - current` in degrees,
/// wrapped to `[-180, 180)`.
fn angle_error_deg(setpoint: f32, current: f32) -> f32 {
    let mut diff = (setpoint - current) % 360.0;
    if diff >= 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}
