//! Attitude setpoint back-solve
//!
//! Desired roll and pitch are not independently commandable: the horizontal
//! force a quadrotor can produce is the total thrust tilted through its
//! attitude. Each step, the roll/pitch setpoints are therefore back-solved
//! from the provisional horizontal force commands and the previous total
//! thrust:
//!
//! φ_des = atan((u1·sinψ_des − u2·cosψ_des) / T)
//! θ_des = atan((u1·cosψ_des + u2·sinψ_des) / T)

use serde::{Deserialize, Serialize};

use crate::state::Actuation;

/// Roll/pitch setpoint implied by a horizontal force command
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeSetpoint {
    /// Desired roll φ [rad]
    pub roll: f64,
    /// Desired pitch θ [rad]
    pub pitch: f64,
}

/// Solve the attitude setpoint from a provisional actuation
///
/// `total_thrust` is the previous step's total rotor thrust; it must be
/// nonzero (the driver seeds it with 1.0 before the first plant step).
pub fn backsolve_attitude(
    provisional: &Actuation,
    desired_yaw: f64,
    total_thrust: f64,
) -> AttitudeSetpoint {
    let (sin_yaw, cos_yaw) = desired_yaw.sin_cos();
    let u1 = provisional.force_x;
    let u2 = provisional.force_y;

    AttitudeSetpoint {
        roll: ((u1 * sin_yaw - u2 * cos_yaw) / total_thrust).atan(),
        pitch: ((u1 * cos_yaw + u2 * sin_yaw) / total_thrust).atan(),
    }
}
