//! Simulation configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::SlidingGains;
use crate::model::QuadrotorParams;
use crate::simulation::trajectory::Trajectory;
use crate::state::State;

/// Configuration errors raised before a simulator is constructed
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("duration must be positive and finite, got {0}")]
    InvalidDuration(f64),
    #[error("duration {duration} is shorter than one time step {dt}")]
    DurationBelowTimeStep { duration: f64, dt: f64 },
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Time step [s]
    pub dt: f64,
    /// Total simulated duration [s]
    pub duration: f64,
    /// Apply the plant mass-mismatch perturbation
    pub mass_mismatch: bool,
    /// Vehicle physical constants (shared by controller and plant)
    pub vehicle: QuadrotorParams,
    /// Controller gain set
    pub gains: SlidingGains,
    /// Desired-state trajectory
    pub trajectory: Trajectory,
    /// Initial vehicle state
    pub initial_state: State,
}

impl Default for SimConfig {
    /// The calibration scenario: 100 s of the unit circle at dt = 0.1
    fn default() -> Self {
        Self {
            dt: 0.1,
            duration: 100.0,
            mass_mismatch: false,
            vehicle: QuadrotorParams::default(),
            gains: SlidingGains::default(),
            trajectory: Trajectory::calibration_circle(),
            initial_state: State::zeros(),
        }
    }
}

impl SimConfig {
    /// Reject configurations the numerical loop cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        if self.duration < self.dt {
            return Err(ConfigError::DurationBelowTimeStep {
                duration: self.duration,
                dt: self.dt,
            });
        }
        Ok(())
    }

    /// Number of steps the configured run will take
    pub fn num_steps(&self) -> usize {
        (self.duration / self.dt).round() as usize
    }
}
