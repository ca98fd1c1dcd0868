//! Closed-loop validation tests
//!
//! End-to-end properties of the coupled controller/plant pipeline:
//! 1. Determinism of full runs
//! 2. The mass-mismatch branch touches only translational dynamics
//! 3. Trajectory tracking on the calibration circle (regression oracle)
//! 4. Robustness of the tracking loop under plant mass mismatch
//! 5. NaN/Inf outside the attitude envelope is surfaced, never masked

use approx::assert_relative_eq;
use std::f64::consts::FRAC_PI_2;

use smquad_core::simulation::{SimConfig, SimHistory, Simulator, Trajectory};
use smquad_core::state::State;

fn run_calibration(mass_mismatch: bool) -> SimHistory {
    let mut config = SimConfig::default();
    config.mass_mismatch = mass_mismatch;

    let mut sim = Simulator::new(config).unwrap();
    sim.run().clone()
}

mod determinism {
    use super::*;

    #[test]
    fn test_identical_runs_are_bit_identical() {
        let a = run_calibration(false);
        let b = run_calibration(false);

        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert_eq!(a.states[i], b.states[i]);
            assert_eq!(a.actuations[i], b.actuations[i]);
            assert_eq!(a.thrusts[i], b.thrusts[i]);
        }
    }
}

mod mass_mismatch {
    use super::*;

    #[test]
    fn test_first_step_differs_only_in_translation() {
        // Identical state and actuation reach both plants on the first
        // step; the rotational half of the state must come out identical
        let nominal = run_calibration(false);
        let mismatched = run_calibration(true);

        let a = &nominal.states[1];
        let b = &mismatched.states[1];
        for i in 6..12 {
            assert_eq!(a[i], b[i], "rotational component {} diverged", i);
        }
        assert_ne!(nominal.thrusts[0], mismatched.thrusts[0]);
    }

    #[test]
    fn test_tracking_survives_heavier_plant() {
        // Sliding-mode control is the robustness claim: a 25% heavier
        // plant must still settle onto the commanded altitude
        let history = run_calibration(true);

        let last = history.states.last().unwrap();
        assert!(last.is_finite());
        assert_relative_eq!(last.z(), 1.0, epsilon = 0.1);
    }
}

mod circle_tracking {
    use super::*;

    /// Steady-state slice of the run (transient discarded)
    fn tail(history: &SimHistory) -> std::ops::Range<usize> {
        let n = history.len();
        (n * 7 / 10)..n
    }

    #[test]
    fn test_run_is_bounded_everywhere() {
        let history = run_calibration(false);

        assert_eq!(history.len(), 1000);
        for (i, state) in history.states.iter().enumerate() {
            assert!(state.is_finite(), "state diverged at step {}", i);
        }
        for act in &history.actuations {
            assert!(act.is_finite());
        }
    }

    #[test]
    fn test_altitude_holds_commanded_value() {
        let history = run_calibration(false);

        for i in tail(&history) {
            assert_relative_eq!(history.states[i].z(), 1.0, epsilon = 0.05);
        }
    }

    #[test]
    fn test_horizontal_tracking_follows_the_circle() {
        let history = run_calibration(false);
        let steady = tail(&history);

        let mut max_err: f64 = 0.0;
        let mut sum_err = 0.0;
        let mut max_x: f64 = 0.0;
        let mut max_y: f64 = 0.0;
        let mut count = 0usize;

        for i in steady.clone() {
            let ex = (history.states[i].x() - history.desired[i].x()).abs();
            let ey = (history.states[i].y() - history.desired[i].y()).abs();
            max_err = max_err.max(ex).max(ey);
            sum_err += ex + ey;
            max_x = max_x.max(history.states[i].x().abs());
            max_y = max_y.max(history.states[i].y().abs());
            count += 2;
        }
        let mean_err = sum_err / count as f64;

        // Amplitude near the commanded unit circle
        assert!(max_x > 0.5 && max_x < 1.3, "x amplitude {}", max_x);
        assert!(max_y > 0.5 && max_y < 1.3, "y amplitude {}", max_y);

        // Bounded steady-state tracking error; the calibrated gains carry a
        // phase lag, so the envelope is generous but must not blow up
        assert!(max_err < 0.8, "max tracking error {}", max_err);
        assert!(mean_err < 0.5, "mean tracking error {}", mean_err);
    }

    #[test]
    fn test_tracking_is_in_phase_with_the_command() {
        // Normalized cross-correlation between response and command stays
        // strongly positive once the transient has died out
        let history = run_calibration(false);
        let steady = tail(&history);

        let mut dot = 0.0;
        let mut norm_state = 0.0;
        let mut norm_desired = 0.0;
        for i in steady {
            let (x, xd) = (history.states[i].x(), history.desired[i].x());
            let (y, yd) = (history.states[i].y(), history.desired[i].y());
            dot += x * xd + y * yd;
            norm_state += x * x + y * y;
            norm_desired += xd * xd + yd * yd;
        }
        let correlation = dot / (norm_state.sqrt() * norm_desired.sqrt());

        assert!(correlation > 0.7, "phase correlation {}", correlation);
    }

    #[test]
    fn test_attitude_stays_inside_envelope() {
        let history = run_calibration(false);

        for state in &history.states {
            assert!(state.roll().abs() < 0.6, "roll left envelope");
            assert!(state.pitch().abs() < 0.6, "pitch left envelope");
        }
    }
}

mod envelope_boundary {
    use super::*;
    use smquad_core::control::{ControllerMemory, SlidingModeController};
    use smquad_core::dynamics::PlantDynamics;

    #[test]
    fn test_collapsed_thrust_memory_surfaces_non_finite_values() {
        // A zero total-thrust feedback collapses the horizontal inversion;
        // the controller and the plant must both propagate the non-finite
        // values instead of clamping them away
        let controller = SlidingModeController::default();
        let mut desired = State::zeros();
        desired.set_x(1.0);

        let act = controller.compute(
            &State::zeros(),
            &desired,
            &ControllerMemory::new(0.0, 0.0),
            0.1,
        );
        assert!(!act.is_finite());

        let result = PlantDynamics::default().step(&State::zeros(), &act, 0.1);
        assert!(!result.state.is_finite());
    }

    #[test]
    fn test_near_singular_attitude_is_wildly_amplified() {
        // cos(θ) never reaches exactly zero in floating point, but the
        // collective inversion grows without bound toward |θ| = π/2; a
        // simulation entering that region leaves the valid flight envelope
        let mut initial = State::zeros();
        initial.set_pitch(FRAC_PI_2 - 1e-12);

        let mut config = SimConfig::default();
        config.duration = 1.0;
        config.initial_state = initial;
        config.trajectory = Trajectory::Hold {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            yaw: 0.0,
        };

        let mut sim = Simulator::new(config).unwrap();
        let step = sim.step();

        // The collective command is astronomically far from hover thrust
        assert!(step.actuation.force_z.abs() > 1e6);
    }
}
