use clap::{Args, Parser, Subcommand};
use fw_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunStage, SweepDefinition, SweepGain,
    run_service, run_sweep, write_csv,
};
use fw_sim::{RunMode, RunStatistics, SimulationParameters};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "fw-cli")]
#[command(about = "Flywheel CLI - PID and fuzzy speed control simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and print its statistics
    Run {
        #[command(flatten)]
        params: ParamArgs,
        /// Abort the run after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Write the simulation_data response message to this file
        #[arg(long)]
        json_out: Option<PathBuf>,
        /// Write the trajectory as CSV to this file
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Answer one start_simulation message
    Request {
        /// JSON message file (defaults to stdin)
        input: Option<PathBuf>,
        /// Response file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sweep one gain over a linear range in parallel
    Sweep {
        #[command(flatten)]
        params: ParamArgs,
        /// Gain to vary (Kp, Ki or Kd)
        gain: String,
        /// First value
        start: f64,
        /// Last value
        end: f64,
        /// Number of points
        #[arg(long, default_value_t = 5)]
        points: usize,
    },
}

/// Simulation parameters; flags override the parameter file.
#[derive(Args)]
struct ParamArgs {
    /// YAML or JSON parameter file
    #[arg(long)]
    params: Option<PathBuf>,
    /// Run mode (single or comparison)
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    mass: Option<f64>,
    #[arg(long)]
    radius: Option<f64>,
    /// Target angular velocity (rad/s)
    #[arg(long)]
    omega_set: Option<f64>,
    #[arg(long)]
    kp: Option<f64>,
    #[arg(long)]
    ki: Option<f64>,
    #[arg(long)]
    kd: Option<f64>,
    /// Viscous damping coefficient
    #[arg(long)]
    b: Option<f64>,
    /// Constant disturbance torque
    #[arg(long)]
    disturbance: Option<f64>,
    /// Actuator torque limit
    #[arg(long)]
    max_torque: Option<f64>,
}

impl ParamArgs {
    fn resolve(&self) -> AppResult<SimulationParameters> {
        let mut params = match &self.params {
            Some(path) => fw_protocol::load_parameters(path)?,
            None => SimulationParameters::default(),
        };
        let overrides = [
            (self.mass, &mut params.mass),
            (self.radius, &mut params.radius),
            (self.omega_set, &mut params.omega_set),
            (self.kp, &mut params.kp),
            (self.ki, &mut params.ki),
            (self.kd, &mut params.kd),
            (self.b, &mut params.b),
            (self.disturbance, &mut params.disturbance),
            (self.max_torque, &mut params.max_torque),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }
        if let Some(mode) = &self.mode {
            params.mode = parse_mode(mode)?;
        }
        Ok(params)
    }
}

fn parse_mode(text: &str) -> AppResult<RunMode> {
    match text.trim().to_ascii_lowercase().as_str() {
        "single" => Ok(RunMode::Single),
        "comparison" => Ok(RunMode::Comparison),
        other => Err(AppError::InvalidInput(format!("unknown mode '{other}'"))),
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            params,
            timeout_ms,
            json_out,
            csv_out,
        } => cmd_run(
            &params,
            timeout_ms,
            json_out.as_deref(),
            csv_out.as_deref(),
        ),
        Commands::Request { input, output } => cmd_request(input.as_deref(), output.as_deref()),
        Commands::Sweep {
            params,
            gain,
            start,
            end,
            points,
        } => cmd_sweep(&params, &gain, start, end, points),
    }
}

fn cmd_run(
    args: &ParamArgs,
    timeout_ms: Option<u64>,
    json_out: Option<&Path>,
    csv_out: Option<&Path>,
) -> AppResult<()> {
    let params = args.resolve()?;
    println!(
        "Running {} simulation: omega_set={} Kp={} Ki={} Kd={} maxTorque={}",
        params.mode.label(),
        params.omega_set,
        params.kp,
        params.ki,
        params.kd,
        params.max_torque
    );

    let options = RunOptions {
        timeout: timeout_ms.map(Duration::from_millis),
        ..RunOptions::default()
    };

    let mut last_emit = Instant::now();
    let response = run_service::run_with_progress(
        &params,
        &options,
        Some(&mut |event| {
            let emit_now =
                event.stage == RunStage::Completed || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();
    let response = response?;

    let output = &response.output;
    println!(
        "✓ Simulation completed: {} steps in {:.3}s",
        output.steps, response.elapsed_wall_s
    );
    print_stats("PID", &output.stats);
    if let Some(fuzzy) = &output.fuzzy_stats {
        print_stats("Fuzzy", fuzzy);
    }

    if let Some(path) = json_out {
        std::fs::write(path, response.message().to_json()?)?;
        println!("✓ Wrote response to {}", path.display());
    }
    if let Some(path) = csv_out {
        write_csv(path, &output.series)?;
        println!(
            "✓ Exported {} samples to {}",
            output.series.len(),
            path.display()
        );
    }

    Ok(())
}

fn cmd_request(input: Option<&Path>, output: Option<&Path>) -> AppResult<()> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let response = run_service::handle_message(&text, &RunOptions::default())?;

    if let Some(path) = output {
        std::fs::write(path, response)?;
    } else {
        println!("{}", response);
    }
    Ok(())
}

fn cmd_sweep(args: &ParamArgs, gain: &str, start: f64, end: f64, points: usize) -> AppResult<()> {
    let params = args.resolve()?;
    let sweep = SweepDefinition::new(gain.parse::<SweepGain>()?, start, end, points)?;
    println!("{} ({} mode)", sweep, params.mode.label());

    let started = Instant::now();
    let results = run_sweep(&params, &sweep, &RunOptions::default())?;

    let comparison = params.mode == RunMode::Comparison;
    if comparison {
        println!(
            "{:>10}  {:>12}  {:>12}  {:>12}  {:>12}",
            sweep.gain, "sse", "iae", "sse_fuzzy", "iae_fuzzy"
        );
    } else {
        println!(
            "{:>10}  {:>12}  {:>12}  {:>12}  {:>12}",
            sweep.gain, "settling_s", "sse", "iae", "int|tau|"
        );
    }

    for point in &results {
        let s = &point.stats;
        match &point.fuzzy_stats {
            Some(f) if comparison => println!(
                "{:>10.4}  {:>12.4e}  {:>12.4e}  {:>12.4e}  {:>12.4e}",
                point.value,
                s.steady_state_error,
                s.integral_error,
                f.steady_state_error,
                f.integral_error
            ),
            _ => println!(
                "{:>10.4}  {:>12}  {:>12.4e}  {:>12.4e}  {:>12.4e}",
                point.value,
                format_settling(s.settling_time),
                s.steady_state_error,
                s.integral_error,
                s.integral_tau_abs.unwrap_or(0.0)
            ),
        }
    }

    println!(
        "✓ {} runs in {:.3}s",
        results.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn format_settling(settling_time: Option<f64>) -> String {
    match settling_time {
        Some(t) => format!("{:.3}", t),
        None => "-".to_string(),
    }
}

fn print_stats(label: &str, stats: &RunStatistics) {
    println!("\n{}:", label);
    if let Some(t) = stats.settling_time {
        println!("  Settling time:       {:.3} s", t);
    }
    println!("  Steady-state error:  {:.6}", stats.steady_state_error);
    println!("  Integral |error|:    {:.6}", stats.integral_error);
    if let Some(tau) = stats.integral_tau_abs {
        println!("  Integral |torque|:   {:.6}", tau);
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let mut line = format!(
        "\r[{}] {:>6.2}%  phase={}  mode={}  elapsed={:.1}s",
        bar,
        fraction * 100.0,
        event.stage.label(),
        event.mode.label(),
        event.elapsed_wall_s
    );
    if let Some(p) = &event.sim {
        line.push_str(&format!(
            "  t={:.3}s  step={}/{}",
            p.sim_time_s, p.step, p.total_steps
        ));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
