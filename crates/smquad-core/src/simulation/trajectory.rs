//! Setpoint generators
//!
//! Desired-state trajectories sampled once per step by the simulator. Only
//! positions and angles are commanded; rate setpoints stay zero — the
//! surface weights turn position error into a rate demand.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// Desired-state trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trajectory {
    /// Hold a fixed setpoint (a step command from the zero initial state)
    Hold { x: f64, y: f64, z: f64, yaw: f64 },
    /// Horizontal circle at constant altitude:
    /// x = r·sin(ω·t), y = r·cos(ω·t)
    Circle {
        radius: f64,
        /// Angular rate ω [rad/s]
        angular_rate: f64,
        altitude: f64,
        yaw: f64,
    },
}

impl Trajectory {
    /// The calibration scenario: unit circle at ω = 0.1 rad/s, 1 m altitude
    pub fn calibration_circle() -> Self {
        Self::Circle {
            radius: 1.0,
            angular_rate: 0.1,
            altitude: 1.0,
            yaw: 0.0,
        }
    }

    /// Sample the desired state at time `t` [s]
    pub fn setpoint(&self, t: f64) -> State {
        let mut desired = State::zeros();
        match *self {
            Trajectory::Hold { x, y, z, yaw } => {
                desired.set_x(x);
                desired.set_y(y);
                desired.set_z(z);
                desired.set_yaw(yaw);
            }
            Trajectory::Circle {
                radius,
                angular_rate,
                altitude,
                yaw,
            } => {
                let phase = angular_rate * t;
                desired.set_x(radius * phase.sin());
                desired.set_y(radius * phase.cos());
                desired.set_z(altitude);
                desired.set_yaw(yaw);
            }
        }
        desired
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::calibration_circle()
    }
}
