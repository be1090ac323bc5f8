//! Clamped-output PID evaluation.

use serde::{Deserialize, Serialize};

/// Gains and output bound of one PID loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Output (and accumulated integral term) is clamped to `[-limit, limit]`.
    pub limit: f32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.002,
            ki: 0.001,
            kd: 0.0001,
            limit: 0.9,
        }
    }
}

/// One PID loop: `out = clamp(kp*e + ki*∫e + kd*de/dt, ±limit)`.
///
/// The integral term is clamped to the output limits as well, so a long
/// saturated period cannot wind up stale error for a future active period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pid {
    config: PidConfig,
    integral: f32,
    last_error: Option<f32>,
}

impl Pid {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            last_error: None,
        }
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Evaluate the loop for error `e` over timestep `dt` seconds.
    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        let limit = self.config.limit;

        if dt > 0.0 {
            self.integral += self.config.ki * error * dt;
            self.integral = self.integral.clamp(-limit, limit);
        }

        let derivative = match (self.last_error, dt > 0.0) {
            (Some(last), true) => (error - last) / dt,
            _ => 0.0,
        };
        self.last_error = Some(error);

        let out = self.config.kp * error + self.integral + self.config.kd * derivative;
        out.clamp(-limit, limit)
    }

    /// Zero the integral and derivative memory; gains and limits untouched.
    ///
    /// Idempotent: calling twice leaves the same state as calling once.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pid(kp: f32, ki: f32, kd: f32, limit: f32) -> Pid {
        Pid::new(PidConfig { kp, ki, kd, limit })
    }

    #[test]
    fn proportional_only_scales_error() {
        let mut p = pid(0.5, 0.0, 0.0, 10.0);
        assert_relative_eq!(p.update(4.0, 0.1), 2.0);
        assert_relative_eq!(p.update(-4.0, 0.1), -2.0);
    }

    #[test]
    fn output_is_clamped_to_limit() {
        let mut p = pid(1.0, 0.0, 0.0, 0.9);
        assert_relative_eq!(p.update(100.0, 0.1), 0.9);
        assert_relative_eq!(p.update(-100.0, 0.1), -0.9);
    }

    #[test]
    fn integral_accumulates_over_steps() {
        let mut p = pid(0.0, 1.0, 0.0, 10.0);
        let first = p.update(1.0, 0.5);
        let second = p.update(1.0, 0.5);
        assert_relative_eq!(first, 0.5);
        assert_relative_eq!(second, 1.0);
    }

    #[test]
    fn integral_term_never_exceeds_limit() {
        let mut p = pid(0.0, 1.0, 0.0, 1.0);
        for _ in 0..100 {
            p.update(10.0, 1.0);
        }
        // One step of opposite error must pull the output back immediately.
        let out = p.update(-10.0, 1.0);
        assert!(out < 1.0);
    }

    #[test]
    fn derivative_reacts_to_error_change() {
        let mut p = pid(0.0, 0.0, 1.0, 10.0);
        assert_relative_eq!(p.update(1.0, 0.1), 0.0); // no previous error yet
        assert_relative_eq!(p.update(2.0, 0.1), 10.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut once = pid(0.1, 0.2, 0.3, 5.0);
        let mut twice = once;
        for e in [1.0, 2.0, -0.5] {
            once.update(e, 0.1);
            twice.update(e, 0.1);
        }
        once.reset();
        twice.reset();
        twice.reset();
        assert_eq!(once, twice);
        assert_relative_eq!(once.update(1.0, 0.1), twice.update(1.0, 0.1));
    }

    #[test]
    fn zero_dt_skips_integral_and_derivative() {
        let mut p = pid(1.0, 1.0, 1.0, 10.0);
        assert_relative_eq!(p.update(2.0, 0.0), 2.0);
        assert_relative_eq!(p.update(3.0, 0.0), 3.0);
    }
}
