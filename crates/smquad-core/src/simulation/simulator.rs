//! Simulation driver
//!
//! Owns the evolving state and threads it through the per-step pipeline in
//! strict order: sample the setpoint, run the two-stage control cycle,
//! advance the plant, carry the achieved thrust/reaction torque into the
//! next step's controller memory. Single-threaded and synchronous
//! throughout; the state is handed over by value each step.

use serde::Serialize;

use crate::control::{ControllerMemory, SlidingModeController};
use crate::dynamics::PlantDynamics;
use crate::model::{NominalModel, PlantModel};
use crate::simulation::config::{ConfigError, SimConfig};
use crate::state::{Actuation, State};

/// Record of one simulation step
#[derive(Debug, Clone, Copy)]
pub struct SimStep {
    /// Time at which the setpoint was sampled [s]
    pub time: f64,
    /// State the controller acted on
    pub state: State,
    /// Desired state after the attitude back-solve
    pub desired: State,
    /// Final actuation applied to the plant
    pub actuation: Actuation,
    /// Total rotor thrust achieved [N]
    pub thrust: f64,
    /// Yaw reaction torque achieved [N·m]
    pub reaction_torque: f64,
}

/// In-memory simulation history
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimHistory {
    /// Time stamps [s]
    pub times: Vec<f64>,
    /// States, one per step
    pub states: Vec<State>,
    /// Desired states (post back-solve), one per step
    pub desired: Vec<State>,
    /// Applied actuations, one per step
    pub actuations: Vec<Actuation>,
    /// Achieved total thrusts [N]
    pub thrusts: Vec<f64>,
    /// Achieved yaw reaction torques [N·m]
    pub reaction_torques: Vec<f64>,
}

impl SimHistory {
    /// Record a simulation step
    pub fn record(&mut self, step: &SimStep) {
        self.times.push(step.time);
        self.states.push(step.state);
        self.desired.push(step.desired);
        self.actuations.push(step.actuation);
        self.thrusts.push(step.thrust);
        self.reaction_torques.push(step.reaction_torque);
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Recorded duration [s]
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Closed-loop simulator
pub struct Simulator {
    config: SimConfig,
    controller: SlidingModeController,
    plant: PlantDynamics,
    state: State,
    memory: ControllerMemory,
    time: f64,
    history: SimHistory,
}

impl Simulator {
    /// Create a simulator from a validated configuration
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let controller = SlidingModeController::new(
            config.gains.clone(),
            NominalModel::new(config.vehicle.clone()),
        );
        let plant_model = if config.mass_mismatch {
            PlantModel::mismatched(config.vehicle.clone())
        } else {
            PlantModel::nominal(config.vehicle.clone())
        };
        let plant = PlantDynamics::new(plant_model);
        let state = config.initial_state;

        Ok(Self {
            config,
            controller,
            plant,
            state,
            memory: ControllerMemory::default(),
            time: 0.0,
            history: SimHistory::default(),
        })
    }

    /// Reset to the initial state, clearing history and controller memory
    pub fn reset(&mut self) {
        self.state = self.config.initial_state;
        self.memory = ControllerMemory::default();
        self.time = 0.0;
        self.history = SimHistory::default();
    }

    /// Advance one step
    pub fn step(&mut self) -> SimStep {
        let dt = self.config.dt;
        let desired = self.config.trajectory.setpoint(self.time);

        let cycle = self
            .controller
            .control_cycle(&self.state, &desired, &self.memory, dt);
        let result = self.plant.step(&self.state, &cycle.actuation, dt);

        let step = SimStep {
            time: self.time,
            state: self.state,
            desired: cycle.desired,
            actuation: cycle.actuation,
            thrust: result.thrust,
            reaction_torque: result.reaction_torque,
        };
        self.history.record(&step);

        self.state = result.state;
        self.memory = ControllerMemory::new(result.thrust, result.reaction_torque);
        self.time += dt;

        step
    }

    /// Run for the configured duration
    pub fn run(&mut self) -> &SimHistory {
        let steps = self.config.num_steps();
        while self.history.len() < steps {
            self.step();
        }
        &self.history
    }

    /// Current simulation time [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Feedback values carried into the next step
    pub fn memory(&self) -> &ControllerMemory {
        &self.memory
    }

    /// Recorded history
    pub fn history(&self) -> &SimHistory {
        &self.history
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
