//! # smquad core
//!
//! Closed-loop simulation of a quadrotor under sliding-mode control.
//!
//! The crate couples two pure components, evaluated once per discrete step:
//!
//! - [`control`]: a sliding-mode controller mapping tracking error to six
//!   actuation signals (three thrust projections, three body torques)
//! - [`dynamics`]: a nonlinear 12-state plant model with rotor-speed
//!   allocation, advanced by semi-implicit Euler integration
//!
//! The [`simulation`] module carries the driving loop: setpoint sampling,
//! the two-stage control cycle (provisional actuation, attitude back-solve,
//! final actuation), the plant step, and history recording.
//!
//! ## Modules
//!
//! - [`state`]: state and actuation vector types
//! - [`model`]: physical parameters, nominal and plant model configurations
//! - [`control`]: gains, sliding-mode controller, attitude setpoint solve
//! - [`dynamics`]: rotor allocation and the plant step
//! - [`simulation`]: configuration, setpoint generators, simulator

pub mod state;
pub mod model;
pub mod control;
pub mod dynamics;
pub mod simulation;

pub use state::{Actuation, DimensionError, State, StateVector};

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;
