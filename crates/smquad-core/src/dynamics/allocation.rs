//! Rotor-speed allocation
//!
//! A "+" configuration rotor bank: front/back rotors counter roll,
//! left/right counter pitch, and all four combine with alternating spin
//! direction for the yaw reaction torque. The allocation inverts the 4×4
//! map from (total thrust, roll torque, pitch torque, yaw reaction torque)
//! to the four rotor speed-squared terms, then re-derives the achieved
//! totals from those speeds. The re-derivation is intentional: it is the
//! rotor bank's view of the command, not the command itself, that drives
//! the plant.

use crate::model::QuadrotorParams;
use crate::state::Actuation;

/// Allocated rotor speeds and the totals they achieve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorAllocation {
    /// Rotor angular-velocity-squared terms ω₁²..ω₄²
    pub speeds_squared: [f64; 4],
    /// Achieved total thrust T [N]
    pub thrust: f64,
    /// Achieved roll torque T2 [N·m]
    pub roll_torque: f64,
    /// Achieved pitch torque T3 [N·m]
    pub pitch_torque: f64,
    /// Achieved yaw reaction torque T4 [N·m]
    pub reaction_torque: f64,
}

impl RotorAllocation {
    /// Solve the allocation for an actuation command
    ///
    /// `mass` is the effective plant mass; the collective channel re-adds
    /// the hover thrust m·g before the total thrust magnitude is formed, so
    /// a zero actuation allocates exactly hover.
    pub fn solve(actuation: &Actuation, params: &QuadrotorParams, mass: f64) -> Self {
        let k = params.thrust_coeff;
        let l = params.arm_length;
        let b = params.reaction_coeff;

        // Total required thrust magnitude
        let t1 = ((actuation.force_z + mass * params.gravity).powi(2)
            + actuation.force_x.powi(2)
            + actuation.force_y.powi(2))
        .sqrt();

        let collective = t1 / (4.0 * k);
        let roll_split = params.inertia_x * actuation.torque_roll / (2.0 * k * l);
        let pitch_split = params.inertia_y * actuation.torque_pitch / (2.0 * k * l);
        let yaw_split = params.inertia_z * actuation.torque_yaw / (4.0 * b);

        let o1 = collective - pitch_split - yaw_split;
        let o2 = collective - roll_split + yaw_split;
        let o3 = collective + pitch_split - yaw_split;
        let o4 = collective + roll_split + yaw_split;

        // Forward recombination of the achieved totals
        Self {
            speeds_squared: [o1, o2, o3, o4],
            thrust: k * (o1 + o2 + o3 + o4),
            roll_torque: l * k * (o4 - o2),
            pitch_torque: l * k * (o3 - o1),
            reaction_torque: b * (o2 + o4 - o1 - o3),
        }
    }
}
