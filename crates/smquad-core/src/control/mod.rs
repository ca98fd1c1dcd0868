//! Sliding-mode control
//!
//! - Gains, controller memory, acceleration feed-forward
//! - The six-channel sliding-mode controller and its two-stage control cycle
//! - Attitude setpoint back-solve from horizontal force commands

pub mod gains;
pub mod setpoint;
pub mod sliding;

pub use gains::*;
pub use setpoint::*;
pub use sliding::*;
