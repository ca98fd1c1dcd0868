//! Physical model configuration
//!
//! The same 15 physical constants parameterize both components, but the two
//! copies are deliberately independent: the controller works from a
//! [`NominalModel`], the plant from a [`PlantModel`] whose mass may be
//! scaled to emulate model mismatch for robustness testing. Nothing else
//! differs between the two.

use serde::{Deserialize, Serialize};

use crate::state::DimensionError;
use crate::GRAVITY;

/// Plant mass multiplier applied when model mismatch is enabled
pub const MASS_MISMATCH_SCALE: f64 = 1.25;

/// Per-axis aerodynamic drag coefficients, in the (z, x, y) packing the
/// constants vector uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragCoefficients {
    pub z: f64,
    pub x: f64,
    pub y: f64,
}

/// Physical constants of the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrotorParams {
    /// Rotor thrust coefficient K [N·s²]
    pub thrust_coeff: f64,
    /// Mass m [kg]
    pub mass: f64,
    /// Gravity g [m/s²]
    pub gravity: f64,
    /// Arm length l [m] (mass centre to rotor)
    pub arm_length: f64,
    /// Rotor reaction-torque coefficient b [N·m·s²]
    pub reaction_coeff: f64,
    /// Translational drag coefficients
    pub linear_drag: DragCoefficients,
    /// Rotational drag coefficients
    pub angular_drag: DragCoefficients,
    /// Moment of inertia about body x [kg·m²]
    pub inertia_x: f64,
    /// Moment of inertia about body y [kg·m²]
    pub inertia_y: f64,
    /// Moment of inertia about body z [kg·m²]
    pub inertia_z: f64,
    /// Rotor moment of inertia J_r [kg·m²]
    pub rotor_inertia: f64,
}

impl Default for QuadrotorParams {
    /// Calibration vehicle (0.65 kg, 0.23 m arms)
    fn default() -> Self {
        Self {
            thrust_coeff: 2.98e-6,
            mass: 0.65,
            gravity: GRAVITY,
            arm_length: 0.23,
            reaction_coeff: 3.13e-5,
            linear_drag: DragCoefficients {
                z: 0.001,
                x: 0.00075,
                y: 0.00075,
            },
            angular_drag: DragCoefficients {
                z: 0.001,
                x: 0.00075,
                y: 0.00075,
            },
            inertia_x: 0.0075,
            inertia_y: 0.0075,
            inertia_z: 0.013,
            rotor_inertia: 0.00005,
        }
    }
}

impl QuadrotorParams {
    /// Build from the packed 15-constant ordering
    /// `[K, m, g, l, b, kft_z, kft_x, kft_y, kfr_z, kfr_x, kfr_y, J_x, J_y, J_z, J_r]`
    pub fn try_from_slice(values: &[f64]) -> Result<Self, DimensionError> {
        if values.len() != 15 {
            return Err(DimensionError::Constants(values.len()));
        }
        Ok(Self {
            thrust_coeff: values[0],
            mass: values[1],
            gravity: values[2],
            arm_length: values[3],
            reaction_coeff: values[4],
            linear_drag: DragCoefficients {
                z: values[5],
                x: values[6],
                y: values[7],
            },
            angular_drag: DragCoefficients {
                z: values[8],
                x: values[9],
                y: values[10],
            },
            inertia_x: values[11],
            inertia_y: values[12],
            inertia_z: values[13],
            rotor_inertia: values[14],
        })
    }

    /// Thrust that balances gravity [N]
    pub fn hover_thrust(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Inertia-ratio and arm-length coefficients linearizing the rotational
    /// coupling terms
    pub fn inertia_ratios(&self) -> InertiaRatios {
        InertiaRatios {
            a1: (self.inertia_y - self.inertia_z) / self.inertia_x,
            a2: (self.inertia_z - self.inertia_x) / self.inertia_y,
            a3: (self.inertia_x - self.inertia_y) / self.inertia_z,
            b1: self.arm_length / self.inertia_x,
            b2: self.arm_length / self.inertia_y,
            b3: self.arm_length / self.inertia_z,
        }
    }
}

/// Coefficient pairs derived from the moments of inertia and arm length
#[derive(Debug, Clone, Copy)]
pub struct InertiaRatios {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
}

/// The controller's internal model of the vehicle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NominalModel {
    pub params: QuadrotorParams,
}

impl NominalModel {
    pub fn new(params: QuadrotorParams) -> Self {
        Self { params }
    }
}

/// The model the plant dynamics integrate
///
/// `mass_scale` emulates plant/model mismatch: the dynamics see a heavier
/// vehicle than the controller assumes, everything else identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantModel {
    pub params: QuadrotorParams,
    pub mass_scale: f64,
}

impl PlantModel {
    /// Plant matching the nominal model exactly
    pub fn nominal(params: QuadrotorParams) -> Self {
        Self {
            params,
            mass_scale: 1.0,
        }
    }

    /// Plant with the mass-mismatch perturbation applied
    pub fn mismatched(params: QuadrotorParams) -> Self {
        Self {
            params,
            mass_scale: MASS_MISMATCH_SCALE,
        }
    }

    /// Mass the dynamics actually integrate [kg]
    pub fn effective_mass(&self) -> f64 {
        self.params.mass * self.mass_scale
    }
}

impl Default for PlantModel {
    fn default() -> Self {
        Self::nominal(QuadrotorParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_params() {
        let params = QuadrotorParams::default();
        assert_relative_eq!(params.mass, 0.65);
        assert_relative_eq!(params.arm_length, 0.23);
        assert_relative_eq!(params.hover_thrust(), 0.65 * 9.81);
    }

    #[test]
    fn test_packed_constants_ordering() {
        let packed = [
            2.98e-6, 0.65, 9.81, 0.23, 3.13e-5, 0.001, 0.00075, 0.00075, 0.001, 0.00075, 0.00075,
            0.0075, 0.0075, 0.013, 0.00005,
        ];
        let params = QuadrotorParams::try_from_slice(&packed).unwrap();
        assert_eq!(params, QuadrotorParams::default());
    }

    #[test]
    fn test_packed_constants_rejects_wrong_arity() {
        assert_eq!(
            QuadrotorParams::try_from_slice(&[0.0; 14]),
            Err(DimensionError::Constants(14))
        );
    }

    #[test]
    fn test_inertia_ratios() {
        let ratios = QuadrotorParams::default().inertia_ratios();

        assert_relative_eq!(ratios.a1, (0.0075 - 0.013) / 0.0075, epsilon = 1e-12);
        assert_relative_eq!(ratios.a2, (0.013 - 0.0075) / 0.0075, epsilon = 1e-12);
        assert_relative_eq!(ratios.a3, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ratios.b1, 0.23 / 0.0075, epsilon = 1e-12);
        assert_relative_eq!(ratios.b2, 0.23 / 0.0075, epsilon = 1e-12);
        assert_relative_eq!(ratios.b3, 0.23 / 0.013, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_mismatch_scale() {
        let params = QuadrotorParams::default();

        let nominal = PlantModel::nominal(params.clone());
        assert_relative_eq!(nominal.effective_mass(), 0.65);

        let mismatched = PlantModel::mismatched(params);
        assert_relative_eq!(mismatched.effective_mass(), 0.65 * 1.25);
    }
}
