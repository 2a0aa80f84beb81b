//! Result records returned to callers.

use crate::condition::FlightCondition;
use crate::cycle::OffdesignEvaluation;
use crate::params::{BaselineParameters, DesignParameters, OffdesignParameters};
use serde::{Deserialize, Serialize};
use tc_core::units::{Force, MassRate, Pressure, Temperature, k, kgps, newton, pa};
use tc_solver::{ColumnReport, ConvergenceStatus};

/// How the solve of one condition ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub status: ConvergenceStatus,
    pub iterations: usize,
    pub residual_norm: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl From<&ColumnReport> for SolveOutcome {
    fn from(report: &ColumnReport) -> Self {
        Self {
            status: report.status,
            iterations: report.iterations,
            residual_norm: report.residual_norm,
            diagnostics: report.diagnostics.clone(),
        }
    }
}

impl SolveOutcome {
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }
}

/// Matched cycle at one condition.
///
/// Thrust and fuel flow cover all engines; mass flows are per engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePerformance {
    pub thrust: Force,
    pub fuel_flow: MassRate,
    /// kg/(N·s)
    pub tsfc: f64,
    pub specific_thrust: f64,
    pub core_mass_flow: MassRate,
    pub fan_mass_flow: MassRate,
    pub bypass_ratio: f64,
    pub fuel_fraction: f64,
    /// Physical speeds relative to design
    pub low_spool_speed: f64,
    pub fan_speed: f64,
    pub high_spool_speed: f64,
    pub fan_pressure_ratio: f64,
    pub lpc_pressure_ratio: f64,
    pub hpc_pressure_ratio: f64,
    pub overall_pressure_ratio: f64,
    pub compressor_exit_temperature: Temperature,
    pub compressor_exit_pressure: Pressure,
    pub turbine_inlet_temperature: Temperature,
}

impl CyclePerformance {
    pub(crate) fn new(
        eval: &OffdesignEvaluation,
        x: &BaselineParameters,
        number_of_engines: usize,
    ) -> Self {
        let engines = number_of_engines as f64;
        let s = &eval.stations;
        Self {
            thrust: newton(eval.performance.thrust * engines),
            fuel_flow: kgps(eval.performance.fuel_flow * engines),
            tsfc: eval.performance.tsfc,
            specific_thrust: eval.performance.specific_thrust,
            core_mass_flow: kgps(eval.core_mass_flow),
            fan_mass_flow: kgps(eval.bypass_ratio * eval.core_mass_flow),
            bypass_ratio: eval.bypass_ratio,
            fuel_fraction: s.fuel_fraction,
            low_spool_speed: eval.low_spool_speed,
            fan_speed: eval.fan_speed,
            high_spool_speed: eval.high_spool_speed,
            fan_pressure_ratio: x.fan_pressure_ratio,
            lpc_pressure_ratio: x.lpc_pressure_ratio,
            hpc_pressure_ratio: x.hpc_pressure_ratio,
            overall_pressure_ratio: s.t3.pressure / s.t2.pressure,
            compressor_exit_temperature: k(s.t3.temperature),
            compressor_exit_pressure: pa(s.t3.pressure),
            turbine_inlet_temperature: k(s.t4.temperature),
        }
    }
}

/// Solve outcome plus, when the final iterate can be evaluated, the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub condition: FlightCondition,
    pub outcome: SolveOutcome,
    pub performance: Option<CyclePerformance>,
}

/// Output of an off-design batch solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffdesignSolution {
    /// Final unknowns, reusable as a warm-start seed
    pub parameters: OffdesignParameters,
    pub points: Vec<OperatingPoint>,
    pub steps: usize,
    pub batch_evaluations: usize,
}

impl OffdesignSolution {
    pub fn all_converged(&self) -> bool {
        self.points.iter().all(|p| p.outcome.converged())
    }
}

/// Vehicle-level thrust at one commanded throttle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrustEvaluation {
    pub commanded_throttle: f64,
    /// Throttle the cycle was matched at, clamped to the operating window
    pub matched_throttle: f64,
    /// Body-x thrust of all operating engines; zero if the cycle could not be evaluated
    pub thrust: Force,
    pub fuel_flow: MassRate,
    /// kg/(N·s)
    pub tsfc: f64,
    pub outcome: SolveOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrustSchedule {
    pub parameters: OffdesignParameters,
    pub evaluations: Vec<ThrustEvaluation>,
}

/// Design record plus the sea-level-static check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingReport {
    pub design: DesignParameters,
    pub sea_level_static: OperatingPoint,
}
