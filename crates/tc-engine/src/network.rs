//! The turbofan entity: sizing and batch off-design evaluation.

use crate::condition::FlightCondition;
use crate::config::TurbofanConfig;
use crate::cycle::{self, EngineComponents};
use crate::error::{EngineError, EngineResult};
use crate::params::{BASELINE_LEN, BaselineParameters, DesignParameters, OffdesignParameters};
use crate::results::{
    CyclePerformance, OffdesignSolution, OperatingPoint, SizingReport, SolveOutcome,
    ThrustEvaluation, ThrustSchedule,
};
use nalgebra::DVector;
use rayon::prelude::*;
use tc_core::units::{kgps, m, newton};
use tc_solver::{BatchProblem, NewtonConfig, SolverError, SolverResult, solve_batch};
use tracing::{debug, info, warn};
use uom::si::force::newton as newtons;
use uom::si::mass_rate::kilogram_per_second;

/// Throttle window over which the cycle is matched; commands outside it are
/// met by linear scaling of the nearest matched point.
pub const MIN_MATCHED_THROTTLE: f64 = 0.6;
pub const MAX_MATCHED_THROTTLE: f64 = 1.0;

/// Off-design matching posed as a batch problem, one column per condition.
struct OffdesignProblem<'a> {
    parts: &'a EngineComponents,
    design: &'a DesignParameters,
    conditions: &'a [FlightCondition],
}

impl BatchProblem for OffdesignProblem<'_> {
    fn unknowns(&self) -> usize {
        BASELINE_LEN
    }

    fn batch_size(&self) -> usize {
        self.conditions.len()
    }

    fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let baseline = baseline_of(x)?;
        let eval = cycle::offdesign(self.parts, self.design, &self.conditions[column], &baseline)?;
        Ok(DVector::from_row_slice(&eval.residual))
    }

    fn physical_violations(&self, _column: usize, x: &DVector<f64>) -> Vec<String> {
        baseline_of(x).map(|b| b.violations()).unwrap_or_default()
    }
}

fn baseline_of(x: &DVector<f64>) -> SolverResult<BaselineParameters> {
    BaselineParameters::from_slice(x.as_slice()).map_err(|e| SolverError::Numeric {
        what: e.to_string(),
    })
}

/// A sized (or yet to be sized) two-spool turbofan installation.
#[derive(Debug, Clone)]
pub struct Turbofan {
    config: TurbofanConfig,
    parts: EngineComponents,
    design: Option<DesignParameters>,
    solver: NewtonConfig,
}

impl Turbofan {
    pub fn new(config: TurbofanConfig) -> EngineResult<Self> {
        config.validate()?;
        let parts = EngineComponents::from_config(&config)?;
        Ok(Self {
            config,
            parts,
            design: None,
            solver: NewtonConfig::default(),
        })
    }

    pub fn with_solver_config(mut self, solver: NewtonConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn config(&self) -> &TurbofanConfig {
        &self.config
    }

    pub fn number_of_engines(&self) -> usize {
        self.config.number_of_engines
    }

    pub fn design(&self) -> Option<&DesignParameters> {
        self.design.as_ref()
    }

    /// Size the engine at the configured design point, then check the
    /// sea-level-static operating point.
    pub fn size(&mut self) -> EngineResult<SizingReport> {
        let point = &self.config.design;
        let condition =
            FlightCondition::from_altitude(m(point.altitude_m), point.delta_isa_k, point.mach, 1.0)?;
        let thrust_per_engine = point.total_thrust_n / self.config.number_of_engines as f64;

        let design = cycle::design_point(&self.parts, &self.config, &condition, thrust_per_engine)?;
        self.design = Some(design.clone());

        let sls = FlightCondition::from_altitude(m(0.0), 0.0, 0.0, 1.0)?;
        let solution = self.offdesign(&[sls], None)?;
        let sea_level_static = solution
            .points
            .into_iter()
            .next()
            .ok_or(EngineError::EmptyBatch)?;

        match &sea_level_static.performance {
            Some(p) if sea_level_static.outcome.converged() => info!(
                thrust_n = p.thrust.get::<newtons>(),
                "sea-level-static thrust"
            ),
            _ => warn!(
                status = ?sea_level_static.outcome.status,
                "sea-level-static point did not converge"
            ),
        }

        Ok(SizingReport {
            design,
            sea_level_static,
        })
    }

    /// Match the cycle at every condition of `conditions`.
    ///
    /// The seed, if given, must come from a previous solve of this design with
    /// the same batch size; it is not modified. Without a seed every condition
    /// starts from the design point.
    pub fn offdesign(
        &self,
        conditions: &[FlightCondition],
        seed: Option<&OffdesignParameters>,
    ) -> EngineResult<OffdesignSolution> {
        let design = self.design.as_ref().ok_or(EngineError::NotSized)?;
        if conditions.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        for c in conditions {
            c.validate()?;
        }

        let start = match seed {
            Some(seed) => {
                if seed.len() != conditions.len() {
                    return Err(EngineError::SeedMismatch {
                        expected: conditions.len(),
                        found: seed.len(),
                    });
                }
                if seed.design != *design {
                    return Err(EngineError::invalid(
                        "seed",
                        "design",
                        "seed was produced by a different design",
                    ));
                }
                seed.pack()
            }
            None => OffdesignParameters::from_design(design, conditions.len()).pack(),
        };

        let problem = OffdesignProblem {
            parts: &self.parts,
            design,
            conditions,
        };
        let batch = solve_batch(&problem, start, &self.solver)?;
        debug!(
            conditions = conditions.len(),
            steps = batch.steps,
            evaluations = batch.batch_evaluations,
            "off-design solve finished"
        );

        let parameters = OffdesignParameters::unpack(design.clone(), &batch.x)?;
        let engines = self.config.number_of_engines;
        let points = conditions
            .par_iter()
            .zip(parameters.baselines.par_iter())
            .zip(batch.columns.par_iter())
            .map(|((condition, x), report)| {
                let performance = cycle::offdesign(&self.parts, design, condition, x)
                    .ok()
                    .map(|eval| CyclePerformance::new(&eval, x, engines));
                OperatingPoint {
                    condition: *condition,
                    outcome: SolveOutcome::from(report),
                    performance,
                }
            })
            .collect();

        Ok(OffdesignSolution {
            parameters,
            points,
            steps: batch.steps,
            batch_evaluations: batch.batch_evaluations,
        })
    }

    /// Vehicle thrust at the commanded throttles.
    ///
    /// Each throttle is clamped to the matched window, the cycle is solved at
    /// the clamped value, and thrust and fuel flow are scaled by
    /// `commanded / clamped`.
    pub fn evaluate_thrust(
        &self,
        conditions: &[FlightCondition],
        seed: Option<&OffdesignParameters>,
    ) -> EngineResult<ThrustSchedule> {
        let matched: Vec<FlightCondition> = conditions
            .iter()
            .map(|c| c.with_throttle(c.throttle.clamp(MIN_MATCHED_THROTTLE, MAX_MATCHED_THROTTLE)))
            .collect();
        let solution = self.offdesign(&matched, seed)?;

        let evaluations = conditions
            .iter()
            .zip(&solution.points)
            .map(|(commanded, point)| {
                let matched_throttle = point.condition.throttle;
                let scale = commanded.throttle / matched_throttle;
                let (thrust, fuel_flow, tsfc) = match &point.performance {
                    Some(p) => (
                        p.thrust.get::<newtons>() * scale,
                        p.fuel_flow.get::<kilogram_per_second>() * scale,
                        p.tsfc,
                    ),
                    None => (0.0, 0.0, f64::INFINITY),
                };
                ThrustEvaluation {
                    commanded_throttle: commanded.throttle,
                    matched_throttle,
                    thrust: newton(thrust),
                    fuel_flow: kgps(fuel_flow),
                    tsfc,
                    outcome: point.outcome.clone(),
                }
            })
            .collect();

        Ok(ThrustSchedule {
            parameters: solution.parameters,
            evaluations,
        })
    }

    /// Full-throttle thrust with one engine failed.
    pub fn engine_out(
        &self,
        conditions: &[FlightCondition],
        seed: Option<&OffdesignParameters>,
    ) -> EngineResult<ThrustSchedule> {
        let full: Vec<FlightCondition> = conditions.iter().map(|c| c.with_throttle(1.0)).collect();
        let mut schedule = self.evaluate_thrust(&full, seed)?;

        let n = self.config.number_of_engines as f64;
        let operating = (n - 1.0) / n;
        for e in &mut schedule.evaluations {
            e.thrust = e.thrust * operating;
            e.fuel_flow = e.fuel_flow * operating;
        }
        Ok(schedule)
    }
}
