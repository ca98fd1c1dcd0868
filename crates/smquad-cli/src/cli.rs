//! smquad CLI - closed-loop quadrotor simulation runner

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use smquad_core::simulation::{SimConfig, SimHistory, Simulator, Trajectory};

#[derive(Parser, Debug)]
#[command(name = "smquad")]
#[command(about = "Sliding-mode quadrotor control simulator")]
#[command(version)]
pub struct Args {
    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Skip writing the history file
    #[arg(long)]
    no_export: bool,

    // ── Simulation parameters ─────────────────────────────────
    /// Simulated duration [s]
    #[arg(long, default_value_t = 100.0)]
    duration: f64,

    /// Integration time step [s]
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Run the plant 25% heavier than the controller assumes
    #[arg(long)]
    mass_mismatch: bool,

    // ── Trajectory options ────────────────────────────────────
    #[arg(long, value_enum, default_value = "circle")]
    trajectory: TrajectoryKind,

    /// Circle radius [m]
    #[arg(long, default_value_t = 1.0)]
    radius: f64,

    /// Circle angular rate [rad/s]
    #[arg(long, default_value_t = 0.1)]
    angular_rate: f64,

    /// Commanded altitude [m]
    #[arg(long, default_value_t = 1.0)]
    altitude: f64,

    /// Hold setpoint x [m]
    #[arg(long, default_value_t = 0.5)]
    hold_x: f64,

    /// Hold setpoint y [m]
    #[arg(long, default_value_t = 1.0)]
    hold_y: f64,

    /// Commanded yaw [rad]
    #[arg(long, default_value_t = 0.0)]
    yaw: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrajectoryKind {
    /// Horizontal circle at constant altitude
    Circle,
    /// Hold a fixed setpoint
    Hold,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

pub fn run(args: Args) -> Result<()> {
    println!("smquad (sliding-mode quadrotor simulator)");
    println!("=========================================\n");

    let config = build_config(&args);
    let mut sim = Simulator::new(config).context("invalid simulation configuration")?;

    println!(
        "Running {} steps at dt = {} s...",
        sim.config().num_steps(),
        args.dt
    );
    sim.run();

    print_stats(&sim);

    if !args.no_export {
        write_output(&args, sim.history())?;
    }

    Ok(())
}

fn build_config(args: &Args) -> SimConfig {
    let trajectory = match args.trajectory {
        TrajectoryKind::Circle => Trajectory::Circle {
            radius: args.radius,
            angular_rate: args.angular_rate,
            altitude: args.altitude,
            yaw: args.yaw,
        },
        TrajectoryKind::Hold => Trajectory::Hold {
            x: args.hold_x,
            y: args.hold_y,
            z: args.altitude,
            yaw: args.yaw,
        },
    };

    SimConfig {
        dt: args.dt,
        duration: args.duration,
        mass_mismatch: args.mass_mismatch,
        trajectory,
        ..SimConfig::default()
    }
}

fn print_stats(sim: &Simulator) {
    let history = sim.history();
    let final_state = sim.state();

    let (mut max_err, mut sum_err) = (0.0_f64, 0.0_f64);
    for i in 0..history.len() {
        let ex = history.states[i].x() - history.desired[i].x();
        let ey = history.states[i].y() - history.desired[i].y();
        let err = (ex * ex + ey * ey).sqrt();
        max_err = max_err.max(err);
        sum_err += err;
    }
    let mean_err = sum_err / history.len().max(1) as f64;

    println!("\nSimulation Stats:");
    println!("  Steps:               {}", history.len());
    println!("  Simulated time:      {:.2} s", sim.time());
    println!(
        "  Final position:      ({:.3}, {:.3}, {:.3}) m",
        final_state.x(),
        final_state.y(),
        final_state.z()
    );
    println!("  Mean tracking error: {:.4} m", mean_err);
    println!("  Max tracking error:  {:.4} m", max_err);
    if !final_state.is_finite() {
        println!("  WARNING: state diverged (non-finite values present)");
    }
    println!("-----------------------------");
}

fn write_output(args: &Args, history: &SimHistory) -> Result<()> {
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {:?}", args.output_dir))?;

    let path = match args.format {
        OutputFormat::Csv => {
            let path = args.output_dir.join("simulation.csv");
            write_csv(&path, history)?;
            path
        }
        OutputFormat::Json => {
            let path = args.output_dir.join("simulation.json");
            let json = serde_json::to_string_pretty(history)?;
            std::fs::write(&path, json)?;
            path
        }
    };

    println!("History written to {:?}", path);
    Ok(())
}

fn write_csv(path: &PathBuf, history: &SimHistory) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "time",
        "z",
        "z_rate",
        "x",
        "x_rate",
        "y",
        "y_rate",
        "roll",
        "roll_rate",
        "pitch",
        "pitch_rate",
        "yaw",
        "yaw_rate",
        "force_x",
        "force_y",
        "force_z",
        "torque_roll",
        "torque_pitch",
        "torque_yaw",
        "desired_x",
        "desired_y",
        "desired_z",
        "thrust",
        "reaction_torque",
    ])?;

    for i in 0..history.len() {
        let state = &history.states[i];
        let act = &history.actuations[i];
        let desired = &history.desired[i];

        let mut row = vec![format!("{:.4}", history.times[i])];
        row.extend(state.as_slice().iter().map(|v| format!("{:.6}", v)));
        row.extend(act.to_array().iter().map(|v| format!("{:.6}", v)));
        row.push(format!("{:.6}", desired.x()));
        row.push(format!("{:.6}", desired.y()));
        row.push(format!("{:.6}", desired.z()));
        row.push(format!("{:.6}", history.thrusts[i]));
        row.push(format!("{:.6}", history.reaction_torques[i]));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
