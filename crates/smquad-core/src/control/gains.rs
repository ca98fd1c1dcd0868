//! Controller gains and per-step feedback values

use serde::{Deserialize, Serialize};

use crate::state::DimensionError;

/// Gains of one sliding axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGains {
    /// Surface weight c: position/angle error contribution to the sliding
    /// variable `s = rate_error + c · position_error`
    pub surface_weight: f64,
    /// Switching gain k applied to the smoothed sign of s
    pub switching_gain: f64,
    /// Boundary layer ε of the smoothed switching term `k·s/(|s|+ε)`
    pub boundary_layer: f64,
}

impl AxisGains {
    pub fn new(surface_weight: f64, switching_gain: f64, boundary_layer: f64) -> Self {
        Self {
            surface_weight,
            switching_gain,
            boundary_layer,
        }
    }
}

/// Full gain set, one [`AxisGains`] per controlled axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingGains {
    pub z: AxisGains,
    pub x: AxisGains,
    pub y: AxisGains,
    pub roll: AxisGains,
    pub pitch: AxisGains,
    pub yaw: AxisGains,
}

impl Default for SlidingGains {
    /// Calibrated gain set for the default vehicle
    fn default() -> Self {
        Self {
            z: AxisGains::new(0.415, 0.963, 0.48),
            x: AxisGains::new(0.19, 1.0, 0.3),
            y: AxisGains::new(0.19, 1.0, 0.3),
            roll: AxisGains::new(0.7, 327.0, 0.4),
            pitch: AxisGains::new(2.9, 402.0, 0.4),
            yaw: AxisGains::new(2.9, 402.0, 0.4),
        }
    }
}

impl SlidingGains {
    /// Build from the packed 12-gain ordering
    /// `[c_z, c_x, c_y, c_roll, c_pitch, c_yaw, k_z, k_x, k_y, k_roll, k_pitch, k_yaw]`,
    /// keeping the default boundary layers
    pub fn try_from_packed(values: &[f64]) -> Result<Self, DimensionError> {
        if values.len() != 12 {
            return Err(DimensionError::Gains(values.len()));
        }
        let defaults = Self::default();
        Ok(Self {
            z: AxisGains::new(values[0], values[6], defaults.z.boundary_layer),
            x: AxisGains::new(values[1], values[7], defaults.x.boundary_layer),
            y: AxisGains::new(values[2], values[8], defaults.y.boundary_layer),
            roll: AxisGains::new(values[3], values[9], defaults.roll.boundary_layer),
            pitch: AxisGains::new(values[4], values[10], defaults.pitch.boundary_layer),
            yaw: AxisGains::new(values[5], values[11], defaults.yaw.boundary_layer),
        })
    }
}

/// Plant aggregates fed back into the next control step
///
/// The horizontal force channels divide by `thrust`, and the pitch/yaw
/// gyroscopic compensation is driven by `reaction_torque`. Both come from
/// the previous plant step; before the first one exists the thrust is
/// seeded with 1.0 (the calibrated transient assumes the unit seed, not the
/// hover thrust).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerMemory {
    /// Total rotor thrust T from the previous step [N]
    pub thrust: f64,
    /// Net yaw reaction torque T4 from the previous step [N·m]
    pub reaction_torque: f64,
}

impl Default for ControllerMemory {
    fn default() -> Self {
        Self {
            thrust: 1.0,
            reaction_torque: 0.0,
        }
    }
}

impl ControllerMemory {
    pub fn new(thrust: f64, reaction_torque: f64) -> Self {
        Self {
            thrust,
            reaction_torque,
        }
    }
}

/// Optional acceleration feed-forward, one slot per controlled axis
///
/// Defaults to zero on every axis; the shipped scenarios never set it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelFeedforward {
    pub z: f64,
    pub x: f64,
    pub y: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_gains() {
        let gains = SlidingGains::default();
        assert_relative_eq!(gains.z.surface_weight, 0.415);
        assert_relative_eq!(gains.z.switching_gain, 0.963);
        assert_relative_eq!(gains.z.boundary_layer, 0.48);
        assert_relative_eq!(gains.roll.switching_gain, 327.0);
        assert_relative_eq!(gains.pitch.switching_gain, 402.0);
        assert_relative_eq!(gains.yaw.boundary_layer, 0.4);
    }

    #[test]
    fn test_packed_gain_ordering() {
        let packed = [
            0.415, 0.19, 0.19, 0.7, 2.9, 2.9, 0.963, 1.0, 1.0, 327.0, 402.0, 402.0,
        ];
        let gains = SlidingGains::try_from_packed(&packed).unwrap();
        assert_eq!(gains, SlidingGains::default());
    }

    #[test]
    fn test_packed_gains_reject_wrong_arity() {
        assert_eq!(
            SlidingGains::try_from_packed(&[0.0; 6]),
            Err(DimensionError::Gains(6))
        );
    }

    #[test]
    fn test_memory_seed() {
        let memory = ControllerMemory::default();
        assert_relative_eq!(memory.thrust, 1.0);
        assert_relative_eq!(memory.reaction_torque, 0.0);
    }
}
