//! State and actuation vector types
//!
//! The vehicle state is a 12-component vector with a fixed layout:
//!
//! `[z, ż, x, ẋ, y, ẏ, φ, φ̇, θ, θ̇, ψ, ψ̇]`
//!
//! Even indices hold positions/angles, odd indices their time derivatives.
//! The desired state uses the same layout. Both are passed by value through
//! the control/dynamics pipeline and replaced wholesale each step; nothing
//! in the core mutates a state in place.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backing vector for the 12-component state
pub type StateVector = SVector<f64, 12>;

/// Fixed-arity input errors
///
/// Slice constructors reject any length mismatch outright; inputs are never
/// truncated or padded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimensionError {
    #[error("invalid state dimension: expected 12, got {0}")]
    State(usize),
    #[error("invalid actuation dimension: expected 6, got {0}")]
    Actuation(usize),
    #[error("invalid gain vector dimension: expected 12, got {0}")]
    Gains(usize),
    #[error("invalid physical constants dimension: expected 15, got {0}")]
    Constants(usize),
}

/// Vehicle state (positions/angles interleaved with their rates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State(StateVector);

impl Default for State {
    fn default() -> Self {
        Self::zeros()
    }
}

impl State {
    /// All-zero state (at rest at the origin, level attitude)
    pub fn zeros() -> Self {
        Self(StateVector::zeros())
    }

    pub fn from_vector(vec: StateVector) -> Self {
        Self(vec)
    }

    /// Build a state from a slice, rejecting any length other than 12
    pub fn try_from_slice(values: &[f64]) -> Result<Self, DimensionError> {
        if values.len() != 12 {
            return Err(DimensionError::State(values.len()));
        }
        Ok(Self(StateVector::from_column_slice(values)))
    }

    /// Component-wise tracking error `desired - self`
    pub fn error_to(&self, desired: &State) -> StateVector {
        desired.0 - self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn to_vector(&self) -> StateVector {
        self.0
    }

    /// Altitude z [m]
    pub fn z(&self) -> f64 {
        self.0[0]
    }

    /// Climb rate ż [m/s]
    pub fn z_rate(&self) -> f64 {
        self.0[1]
    }

    /// Inertial x position [m]
    pub fn x(&self) -> f64 {
        self.0[2]
    }

    /// Inertial x velocity [m/s]
    pub fn x_rate(&self) -> f64 {
        self.0[3]
    }

    /// Inertial y position [m]
    pub fn y(&self) -> f64 {
        self.0[4]
    }

    /// Inertial y velocity [m/s]
    pub fn y_rate(&self) -> f64 {
        self.0[5]
    }

    /// Roll angle φ [rad]
    pub fn roll(&self) -> f64 {
        self.0[6]
    }

    /// Roll rate φ̇ [rad/s]
    pub fn roll_rate(&self) -> f64 {
        self.0[7]
    }

    /// Pitch angle θ [rad]
    pub fn pitch(&self) -> f64 {
        self.0[8]
    }

    /// Pitch rate θ̇ [rad/s]
    pub fn pitch_rate(&self) -> f64 {
        self.0[9]
    }

    /// Yaw angle ψ [rad]
    pub fn yaw(&self) -> f64 {
        self.0[10]
    }

    /// Yaw rate ψ̇ [rad/s]
    pub fn yaw_rate(&self) -> f64 {
        self.0[11]
    }

    pub fn set_z(&mut self, value: f64) {
        self.0[0] = value;
    }

    pub fn set_x(&mut self, value: f64) {
        self.0[2] = value;
    }

    pub fn set_y(&mut self, value: f64) {
        self.0[4] = value;
    }

    pub fn set_roll(&mut self, value: f64) {
        self.0[6] = value;
    }

    pub fn set_pitch(&mut self, value: f64) {
        self.0[8] = value;
    }

    pub fn set_yaw(&mut self, value: f64) {
        self.0[10] = value;
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl std::ops::Index<usize> for State {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<StateVector> for State {
    fn from(vec: StateVector) -> Self {
        Self(vec)
    }
}

/// Actuation signals produced by the controller, consumed by the plant
///
/// Slot order on the wire is `[u1, u2, u3, τ₃, τ₄, τ₅]`: thrust projections
/// along inertial x, inertial y, and body z, then the three torque commands
/// the rotor allocation consumes as roll, pitch, yaw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Actuation {
    /// Net thrust projection along inertial x [N]
    pub force_x: f64,
    /// Net thrust projection along inertial y [N]
    pub force_y: f64,
    /// Collective thrust command along body z [N], before the hover offset
    /// the allocation re-adds
    pub force_z: f64,
    /// Roll torque command [N·m]
    pub torque_roll: f64,
    /// Pitch torque command [N·m]
    pub torque_pitch: f64,
    /// Yaw torque command [N·m]
    pub torque_yaw: f64,
}

impl Actuation {
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Build an actuation from a packed slice in slot order, rejecting any
    /// length other than 6
    pub fn try_from_slice(values: &[f64]) -> Result<Self, DimensionError> {
        if values.len() != 6 {
            return Err(DimensionError::Actuation(values.len()));
        }
        Ok(Self {
            force_x: values[0],
            force_y: values[1],
            force_z: values[2],
            torque_roll: values[3],
            torque_pitch: values[4],
            torque_yaw: values[5],
        })
    }

    /// Packed slot-order representation
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.force_x,
            self.force_y,
            self.force_z,
            self.torque_roll,
            self.torque_pitch,
            self.torque_yaw,
        ]
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_state_layout() {
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let state = State::try_from_slice(&values).unwrap();

        assert_relative_eq!(state.z(), 0.0);
        assert_relative_eq!(state.z_rate(), 1.0);
        assert_relative_eq!(state.x(), 2.0);
        assert_relative_eq!(state.x_rate(), 3.0);
        assert_relative_eq!(state.y(), 4.0);
        assert_relative_eq!(state.y_rate(), 5.0);
        assert_relative_eq!(state.roll(), 6.0);
        assert_relative_eq!(state.roll_rate(), 7.0);
        assert_relative_eq!(state.pitch(), 8.0);
        assert_relative_eq!(state.pitch_rate(), 9.0);
        assert_relative_eq!(state.yaw(), 10.0);
        assert_relative_eq!(state.yaw_rate(), 11.0);
    }

    #[test]
    fn test_error_is_desired_minus_state() {
        let state = State::try_from_slice(&[1.0; 12]).unwrap();
        let mut desired = State::zeros();
        desired.set_z(3.0);

        let error = state.error_to(&desired);

        assert_relative_eq!(error[0], 2.0);
        for i in 1..12 {
            assert_relative_eq!(error[i], -1.0);
        }
    }

    #[test]
    fn test_state_rejects_wrong_arity() {
        assert_eq!(
            State::try_from_slice(&[0.0; 11]),
            Err(DimensionError::State(11))
        );
        assert_eq!(
            State::try_from_slice(&[0.0; 13]),
            Err(DimensionError::State(13))
        );
    }

    #[test]
    fn test_actuation_slot_order() {
        let act = Actuation::try_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert_relative_eq!(act.force_x, 1.0);
        assert_relative_eq!(act.force_y, 2.0);
        assert_relative_eq!(act.force_z, 3.0);
        assert_relative_eq!(act.torque_roll, 4.0);
        assert_relative_eq!(act.torque_pitch, 5.0);
        assert_relative_eq!(act.torque_yaw, 6.0);
        assert_eq!(act.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_actuation_rejects_wrong_arity() {
        assert_eq!(
            Actuation::try_from_slice(&[0.0; 5]),
            Err(DimensionError::Actuation(5))
        );
    }

    #[test]
    fn test_finiteness_check() {
        let mut state = State::zeros();
        assert!(state.is_finite());
        state.set_pitch(f64::NAN);
        assert!(!state.is_finite());
    }
}
