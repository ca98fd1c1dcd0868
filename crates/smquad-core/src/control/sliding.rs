//! Sliding-mode controller
//!
//! One first-order sliding surface per controlled axis,
//!
//! s_i = rate_error_i + c_i · position_error_i
//!
//! driven toward zero by a boundary-layer-smoothed switching term
//! `k_i·s_i/(|s_i|+ε_i)`. Each actuation channel sums an acceleration
//! feed-forward, a rate-error term scaled by the step size, a
//! drag/coupling compensation term, and the switching term, then inverts
//! the thrust-direction mapping:
//!
//! - the collective channel divides by cosφ·cosθ
//! - the horizontal channels divide by the previous total thrust T
//! - the torque channels scale by a moment of inertia and add gyroscopic
//!   compensation driven by the previous reaction torque T4
//!
//! The controller is a pure function of its inputs. Divisions are not
//! guarded: callers keep |φ|, |θ| < π/2 and T ≠ 0, or NaN/Inf propagate.

use crate::control::gains::{AccelFeedforward, ControllerMemory, SlidingGains};
use crate::control::setpoint::{backsolve_attitude, AttitudeSetpoint};
use crate::model::NominalModel;
use crate::state::{Actuation, State, StateVector};

/// Smoothed sign function `k·s/(|s|+ε)`
///
/// Approximates discontinuous sliding-mode switching while avoiding
/// chattering; ε keeps the denominator positive for all s.
pub fn switching(s: f64, gain: f64, boundary_layer: f64) -> f64 {
    gain * s / (s.abs() + boundary_layer)
}

/// Sliding variables, one per controlled axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingSurfaces {
    pub z: f64,
    pub x: f64,
    pub y: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl SlidingSurfaces {
    /// Build the six surfaces from a 12-component tracking error
    pub fn from_error(error: &StateVector, gains: &SlidingGains) -> Self {
        Self {
            z: error[1] + gains.z.surface_weight * error[0],
            x: error[3] + gains.x.surface_weight * error[2],
            y: error[5] + gains.y.surface_weight * error[4],
            roll: error[7] + gains.roll.surface_weight * error[6],
            pitch: error[9] + gains.pitch.surface_weight * error[8],
            yaw: error[11] + gains.yaw.surface_weight * error[10],
        }
    }
}

/// Result of one full control cycle
///
/// The truncated fixed-point iteration is kept visible: the provisional
/// actuation from the first pass, the attitude setpoint solved from it, the
/// augmented desired state, and the final actuation from the second pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCycle {
    pub provisional: Actuation,
    pub attitude: AttitudeSetpoint,
    pub desired: State,
    pub actuation: Actuation,
}

/// Six-channel sliding-mode controller
#[derive(Debug, Clone, Default)]
pub struct SlidingModeController {
    pub gains: SlidingGains,
    pub model: NominalModel,
}

impl SlidingModeController {
    pub fn new(gains: SlidingGains, model: NominalModel) -> Self {
        Self { gains, model }
    }

    /// Compute the actuation for one step with zero acceleration
    /// feed-forward
    pub fn compute(
        &self,
        state: &State,
        desired: &State,
        memory: &ControllerMemory,
        dt: f64,
    ) -> Actuation {
        self.compute_with_feedforward(state, desired, memory, dt, &AccelFeedforward::default())
    }

    /// Compute the actuation for one step
    pub fn compute_with_feedforward(
        &self,
        state: &State,
        desired: &State,
        memory: &ControllerMemory,
        dt: f64,
        feedforward: &AccelFeedforward,
    ) -> Actuation {
        let p = &self.model.params;
        let g = &self.gains;
        let m = p.mass;
        let r = p.inertia_ratios();

        let error = state.error_to(desired);
        let s = SlidingSurfaces::from_error(&error, g);

        let force_z = m * (1.0 / (state.roll().cos() * state.pitch().cos()))
            * (feedforward.z
                + g.z.surface_weight * error[1] * dt
                + (p.linear_drag.z / m) * state.z_rate() * dt
                + switching(s.z, g.z.switching_gain, g.z.boundary_layer));

        let force_x = m * (1.0 / memory.thrust)
            * (feedforward.x
                + g.x.surface_weight * error[3] * dt
                + (p.linear_drag.x / m) * state.x_rate() * dt
                + switching(s.x, g.x.switching_gain, g.x.boundary_layer));

        let force_y = m * (1.0 / memory.thrust)
            * (feedforward.y
                + g.y.surface_weight * error[5] * dt
                + (p.linear_drag.y / m) * state.y_rate() * dt
                + switching(s.y, g.y.switching_gain, g.y.boundary_layer));

        // Torque channels: each drives its own axis's sliding surface, with
        // the inertia/drag compensation pairings the gain set was calibrated
        // against. The rate-product coupling divides by the step size; the
        // tracking behavior is tuned around that scaling, do not normalize
        // it.
        let torque_roll = p.inertia_z
            * (feedforward.roll
                + g.roll.surface_weight * error[7] * dt
                - r.a3 * state.roll_rate() * state.pitch_rate() / dt
                + r.b3 * p.angular_drag.z * state.yaw_rate().powi(2) * dt
                + switching(s.roll, g.roll.switching_gain, g.roll.boundary_layer));

        let torque_pitch = p.inertia_x
            * (feedforward.pitch
                + g.pitch.surface_weight * error[9] * dt
                - r.a1 * state.pitch_rate() * state.yaw_rate() / dt
                + (-memory.reaction_torque) * (p.rotor_inertia / p.inertia_x)
                    * state.pitch_rate()
                    * dt
                + r.b1 * p.angular_drag.x * state.roll_rate().powi(2) * dt
                + switching(s.pitch, g.pitch.switching_gain, g.pitch.boundary_layer));

        let torque_yaw = p.inertia_y
            * (feedforward.yaw
                + g.yaw.surface_weight * error[11] * dt
                - r.a2 * state.roll_rate() * state.yaw_rate() / dt
                + (-memory.reaction_torque) * (p.rotor_inertia / p.inertia_y)
                    * state.roll_rate()
                    * dt
                + r.b2 * p.angular_drag.y * state.pitch_rate().powi(2) * dt
                + switching(s.yaw, g.yaw.switching_gain, g.yaw.boundary_layer));

        Actuation {
            force_x,
            force_y,
            force_z,
            torque_roll,
            torque_pitch,
            torque_yaw,
        }
    }

    /// One full control cycle: provisional actuation, attitude back-solve,
    /// final actuation against the augmented desired state
    ///
    /// This is a fixed-point iteration truncated at one refinement; the
    /// intermediate products stay visible in the returned [`ControlCycle`].
    pub fn control_cycle(
        &self,
        state: &State,
        desired: &State,
        memory: &ControllerMemory,
        dt: f64,
    ) -> ControlCycle {
        let provisional = self.compute(state, desired, memory, dt);
        let attitude = backsolve_attitude(&provisional, desired.yaw(), memory.thrust);

        let mut augmented = *desired;
        augmented.set_roll(attitude.roll);
        augmented.set_pitch(attitude.pitch);

        let actuation = self.compute(state, &augmented, memory, dt);

        ControlCycle {
            provisional,
            attitude,
            desired: augmented,
            actuation,
        }
    }
}
