use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tc_core::units::m;
use tc_engine::{
    EngineResult, FlightCondition, OperatingPoint, ThrustEvaluation, Turbofan, TurbofanConfig,
    load_yaml,
};
use tracing_subscriber::EnvFilter;
use uom::si::force::kilonewton;
use uom::si::mass_rate::kilogram_per_second;
use uom::si::pressure::kilopascal;
use uom::si::thermodynamic_temperature::kelvin;

#[derive(Parser)]
#[command(name = "tc-cli")]
#[command(about = "TurboCycle CLI - two-spool turbofan sizing and off-design matching", long_about = None)]
struct Cli {
    /// Engine configuration YAML (defaults to the built-in representative turbofan)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an engine configuration file
    Validate {
        /// Path to the configuration YAML file
        config_path: PathBuf,
    },
    /// Size the engine at its design point and report sea-level-static thrust
    Design,
    /// Match the cycle at a batch of flight conditions
    Offdesign(ConditionArgs),
    /// Full-throttle thrust with one engine failed
    EngineOut(ConditionArgs),
}

/// The batch is every combination of the listed altitudes, Mach numbers and throttles.
#[derive(Args)]
struct ConditionArgs {
    /// Altitudes in metres, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = vec![10_000.0])]
    altitude: Vec<f64>,
    /// Flight Mach numbers, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.78])]
    mach: Vec<f64>,
    /// Throttle settings (fraction of design low-spool speed), comma separated
    #[arg(long, value_delimiter = ',', default_values_t = vec![1.0])]
    throttle: Vec<f64>,
    /// ISA temperature offset in kelvin
    #[arg(long, default_value_t = 0.0)]
    delta_isa: f64,
}

impl ConditionArgs {
    fn conditions(&self) -> EngineResult<Vec<FlightCondition>> {
        let mut out = Vec::new();
        for &h in &self.altitude {
            for &mach in &self.mach {
                for &throttle in &self.throttle {
                    out.push(FlightCondition::from_altitude(m(h), self.delta_isa, mach, throttle)?);
                }
            }
        }
        Ok(out)
    }
}

fn main() -> EngineResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate { config_path } => cmd_validate(config_path),
        Commands::Design => cmd_design(&cli),
        Commands::Offdesign(args) => cmd_offdesign(&cli, args),
        Commands::EngineOut(args) => cmd_engine_out(&cli, args),
    }
}

fn load_config(cli: &Cli) -> EngineResult<TurbofanConfig> {
    match &cli.config {
        Some(path) => load_yaml(path),
        None => Ok(TurbofanConfig::default()),
    }
}

fn sized_engine(cli: &Cli) -> EngineResult<(Turbofan, tc_engine::SizingReport)> {
    let mut engine = Turbofan::new(load_config(cli)?)?;
    let report = engine.size()?;
    Ok((engine, report))
}

fn print_json<T: Serialize>(value: &T) -> EngineResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(config_path: &Path) -> EngineResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = load_yaml(config_path)?;
    println!(
        "✓ Configuration '{}' is valid ({} engines)",
        config.name, config.number_of_engines
    );
    Ok(())
}

fn cmd_design(cli: &Cli) -> EngineResult<()> {
    let (engine, report) = sized_engine(cli)?;
    if cli.json {
        return print_json(&report);
    }

    let d = &report.design;
    let point = &engine.config().design;
    println!("Engine: {}", engine.config().name);
    println!(
        "Design point: Mach {:.2}, {:.0} m, ISA{:+.1} K, {:.1} kN total",
        point.mach,
        point.altitude_m,
        point.delta_isa_k,
        point.total_thrust_n / 1_000.0
    );
    println!("\nPer engine:");
    println!("  Core mass flow:     {:.3} kg/s", d.core_mass_flow);
    println!("  Bypass ratio:       {:.2}", d.bypass_ratio);
    println!("  Fuel-air ratio:     {:.5}", d.fuel_fraction);
    println!("  TSFC:               {:.3} mg/(N·s)", d.tsfc * 1.0e6);
    println!("  Fan tip diameter:   {:.3} m", d.fan_tip_diameter);
    println!("  Fan face area:      {:.4} m²", d.fan_face_area);
    println!("  HPC face area:      {:.4} m²", d.hpc_face_area);
    println!("  Fan nozzle area:    {:.4} m²", d.fan_nozzle_area);
    println!("  Core nozzle area:   {:.4} m²", d.core_nozzle_area);
    println!(
        "  Overall pressure ratio: {:.2}",
        d.lpc.pressure_ratio * d.hpc.pressure_ratio
    );

    println!("\nSea-level static:");
    print_points(std::slice::from_ref(&report.sea_level_static));
    Ok(())
}

fn cmd_offdesign(cli: &Cli, args: &ConditionArgs) -> EngineResult<()> {
    let (engine, _) = sized_engine(cli)?;
    let solution = engine.offdesign(&args.conditions()?, None)?;
    if cli.json {
        return print_json(&solution.points);
    }
    print_points(&solution.points);
    println!(
        "\n{} Newton steps, {} batch evaluations",
        solution.steps, solution.batch_evaluations
    );
    Ok(())
}

fn cmd_engine_out(cli: &Cli, args: &ConditionArgs) -> EngineResult<()> {
    let (engine, _) = sized_engine(cli)?;
    let schedule = engine.engine_out(&args.conditions()?, None)?;
    if cli.json {
        return print_json(&schedule.evaluations);
    }
    println!(
        "One of {} engines inoperative, remaining engines at full throttle",
        engine.number_of_engines()
    );
    print_thrust(&schedule.evaluations);
    Ok(())
}

fn print_points(points: &[OperatingPoint]) {
    println!(
        "{:>9} {:>8} {:>6} {:>6} {:>16} {:>5} {:>10} {:>10} {:>9} {:>7} {:>7}",
        "P0 kPa", "T0 K", "Mach", "thr", "status", "iter", "F kN", "fuel kg/s", "TSFC", "Nl", "OPR"
    );
    for p in points {
        let c = &p.condition;
        print!(
            "{:>9.3} {:>8.2} {:>6.3} {:>6.3} {:>16} {:>5}",
            c.static_pressure.get::<kilopascal>(),
            c.static_temperature.get::<kelvin>(),
            c.mach,
            c.throttle,
            format!("{:?}", p.outcome.status),
            p.outcome.iterations
        );
        match &p.performance {
            Some(perf) => println!(
                " {:>10.3} {:>10.4} {:>9.3} {:>7.4} {:>7.2}",
                perf.thrust.get::<kilonewton>(),
                perf.fuel_flow.get::<kilogram_per_second>(),
                perf.tsfc * 1.0e6,
                perf.low_spool_speed,
                perf.overall_pressure_ratio
            ),
            None => println!(" {:>10}", "-"),
        }
    }
}

fn print_thrust(evaluations: &[ThrustEvaluation]) {
    println!(
        "{:>6} {:>16} {:>5} {:>10} {:>10} {:>9}",
        "thr", "status", "iter", "F kN", "fuel kg/s", "TSFC"
    );
    for e in evaluations {
        println!(
            "{:>6.3} {:>16} {:>5} {:>10.3} {:>10.4} {:>9.3}",
            e.commanded_throttle,
            format!("{:?}", e.outcome.status),
            e.outcome.iterations,
            e.thrust.get::<kilonewton>(),
            e.fuel_flow.get::<kilogram_per_second>(),
            e.tsfc * 1.0e6
        );
    }
}
