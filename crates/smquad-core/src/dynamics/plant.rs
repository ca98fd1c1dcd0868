//! Nonlinear plant step
//!
//! Advances the 12-component state one step under an actuation command:
//!
//! 1. allocate rotor speeds and recombine the achieved thrust/torques
//! 2. advance the six rates one explicit Euler step (gravity, rotated
//!    thrust projection, linear translational drag, rotational coupling,
//!    gyroscopic precession, quadratic rotational drag)
//! 3. advance the six positions/angles using the newly updated rates
//!    (semi-implicit Euler)
//!
//! The step is a pure function; no error paths exist. States that leave the
//! valid flight envelope (|φ| or |θ| near π/2, exploding rates) propagate
//! NaN/Inf as-is.

use serde::{Deserialize, Serialize};

use crate::dynamics::allocation::RotorAllocation;
use crate::model::PlantModel;
use crate::state::{Actuation, State, StateVector};

/// Additive per-axis rate disturbance, applied to the six rate updates
///
/// Zero in every shipped scenario; the hook exists for robustness studies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateDisturbance {
    pub z: f64,
    pub x: f64,
    pub y: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Output of one plant step
///
/// The two scalar aggregates feed the next control step's memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// State after the step
    pub state: State,
    /// Total rotor thrust T achieved this step [N]
    pub thrust: f64,
    /// Net yaw reaction torque T4 achieved this step [N·m]
    pub reaction_torque: f64,
}

/// Plant dynamics model
#[derive(Debug, Clone, Default)]
pub struct PlantDynamics {
    pub model: PlantModel,
}

impl PlantDynamics {
    pub fn new(model: PlantModel) -> Self {
        Self { model }
    }

    /// Advance the state one step with no disturbance
    pub fn step(&self, state: &State, actuation: &Actuation, dt: f64) -> StepResult {
        self.step_with_disturbance(state, actuation, dt, &RateDisturbance::default())
    }

    /// Advance the state one step
    pub fn step_with_disturbance(
        &self,
        state: &State,
        actuation: &Actuation,
        dt: f64,
        disturbance: &RateDisturbance,
    ) -> StepResult {
        let p = &self.model.params;
        let m = self.model.effective_mass();
        let g = p.gravity;
        let r = p.inertia_ratios();

        let alloc = RotorAllocation::solve(actuation, p, m);
        let thrust = alloc.thrust;

        let (sin_roll, cos_roll) = state.roll().sin_cos();
        let (sin_pitch, cos_pitch) = state.pitch().sin_cos();
        let (sin_yaw, cos_yaw) = state.yaw().sin_cos();

        // Rate updates. The rate-product coupling divides by the step size;
        // the calibrated tracking behavior depends on that scaling, do not
        // normalize it.
        let z_rate = state.z_rate() + thrust * dt * (cos_roll * cos_pitch) / m
            - g * dt
            - dt * (p.linear_drag.z / m) * state.z_rate()
            + disturbance.z;

        let x_rate = state.x_rate()
            + thrust * dt * (cos_roll * sin_pitch * cos_yaw + sin_roll * sin_yaw) / m
            - dt * (p.linear_drag.x / m) * state.x_rate()
            + disturbance.x;

        let y_rate = state.y_rate()
            + thrust * dt * (cos_roll * sin_pitch * sin_yaw - sin_roll * cos_yaw) / m
            - dt * (p.linear_drag.y / m) * state.y_rate()
            + disturbance.y;

        let roll_rate = state.roll_rate()
            + r.a1 * state.pitch_rate() * state.yaw_rate() / dt
            + r.b1 * dt * alloc.roll_torque
            + alloc.reaction_torque * dt * (p.rotor_inertia / p.inertia_x) * state.pitch_rate()
            - r.b1 * dt * p.angular_drag.x * state.roll_rate().powi(2)
            + disturbance.roll;

        let pitch_rate = state.pitch_rate()
            + r.a2 * state.roll_rate() * state.yaw_rate() / dt
            + r.b2 * dt * alloc.pitch_torque
            + alloc.reaction_torque * dt * (p.rotor_inertia / p.inertia_y) * state.roll_rate()
            - r.b2 * dt * p.angular_drag.y * state.pitch_rate().powi(2)
            + disturbance.pitch;

        let yaw_rate = state.yaw_rate()
            + r.a3 * state.roll_rate() * state.pitch_rate() / dt
            + r.b3 * dt * alloc.reaction_torque
            - r.b3 * dt * p.angular_drag.z * state.yaw_rate().powi(2)
            + disturbance.yaw;

        // Position updates use the post-update rates
        let next = StateVector::from_column_slice(&[
            state.z() + dt * z_rate,
            z_rate,
            state.x() + dt * x_rate,
            x_rate,
            state.y() + dt * y_rate,
            y_rate,
            state.roll() + dt * roll_rate,
            roll_rate,
            state.pitch() + dt * pitch_rate,
            pitch_rate,
            state.yaw() + dt * yaw_rate,
            yaw_rate,
        ]);

        StepResult {
            state: State::from_vector(next),
            thrust,
            reaction_torque: alloc.reaction_torque,
        }
    }
}
