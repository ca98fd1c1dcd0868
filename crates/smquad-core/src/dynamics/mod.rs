//! Plant dynamics
//!
//! - Rotor-speed allocation from the actuation command and recombination of
//!   the achieved thrust/torques
//! - The nonlinear 12-state plant step (semi-implicit Euler)

pub mod allocation;
pub mod plant;

pub use allocation::*;
pub use plant::*;
