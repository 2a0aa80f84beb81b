//! Column-wise damped Newton iteration over a batch of conditions.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::forward_difference_batch;
use crate::problem::{BatchProblem, evaluate_batch};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum Newton steps per condition
    pub max_iterations: usize,
    /// Absolute tolerance on each condition's residual norm
    pub abs_tol: f64,
    /// Residual norm below which a seed is accepted without iterating
    pub trivial_tol: f64,
    /// Fixed relaxation factor applied to every step
    pub relaxation: f64,
    /// Relative forward-difference perturbation
    pub fd_step: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 80,
            abs_tol: 1e-6,
            trivial_tol: 1e-8,
            relaxation: 1.0,
            fd_step: 1e-8,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.abs_tol > 0.0) || !(self.trivial_tol > 0.0) {
            return Err(SolverError::ProblemSetup {
                what: "tolerances must be positive".to_string(),
            });
        }
        if !(self.relaxation > 0.0 && self.relaxation <= 2.0) {
            return Err(SolverError::ProblemSetup {
                what: format!("relaxation factor {} outside (0, 2]", self.relaxation),
            });
        }
        if !(self.fd_step > 0.0 && self.fd_step < 1e-2) {
            return Err(SolverError::ProblemSetup {
                what: format!("finite difference step {} outside (0, 1e-2)", self.fd_step),
            });
        }
        Ok(())
    }
}

/// Final state of one condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConvergenceStatus {
    Converged,
    /// Iteration budget exhausted above tolerance
    NotConverged,
    SingularJacobian,
    /// The model produced a non-finite value or failed to evaluate
    NonFinite,
}

impl ConvergenceStatus {
    pub fn is_converged(self) -> bool {
        self == ConvergenceStatus::Converged
    }
}

/// Outcome of one condition of the batch.
#[derive(Clone, Debug)]
pub struct ColumnReport {
    pub status: ConvergenceStatus,
    /// Newton steps taken
    pub iterations: usize,
    /// Euclidean norm of the last finite residual
    pub residual_norm: f64,
    /// Last finite residual, empty if the seed could not be evaluated
    pub residual: DVector<f64>,
    /// Physical-range violations and failure messages, in order of occurrence
    pub diagnostics: Vec<String>,
}

impl ColumnReport {
    fn pending(n: usize) -> Self {
        Self {
            status: ConvergenceStatus::NotConverged,
            iterations: 0,
            residual_norm: f64::INFINITY,
            residual: DVector::zeros(n),
            diagnostics: Vec::new(),
        }
    }

    /// Convert a non-converged status into the matching error.
    pub fn ensure_converged(&self, column: usize) -> SolverResult<()> {
        match self.status {
            ConvergenceStatus::Converged => Ok(()),
            ConvergenceStatus::NotConverged => Err(SolverError::NonConvergence {
                column,
                iterations: self.iterations,
                residual_norm: self.residual_norm,
            }),
            ConvergenceStatus::SingularJacobian => Err(SolverError::SingularJacobian {
                column,
                iteration: self.iterations + 1,
            }),
            ConvergenceStatus::NonFinite => Err(SolverError::NonFinite {
                column,
                what: self
                    .diagnostics
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "residual evaluation failed".to_string()),
            }),
        }
    }
}

/// Result of a batch solve.
#[derive(Clone, Debug)]
pub struct BatchSolution {
    /// Final iterate, one column per condition
    pub x: DMatrix<f64>,
    pub columns: Vec<ColumnReport>,
    /// Newton steps taken by the batch as a whole
    pub steps: usize,
    /// Number of batch residual evaluations, including Jacobian perturbations
    pub batch_evaluations: usize,
}

impl BatchSolution {
    pub fn all_converged(&self) -> bool {
        self.columns.iter().all(|c| c.status.is_converged())
    }

    /// First non-converged condition as an error.
    pub fn ensure_converged(&self) -> SolverResult<()> {
        self.columns
            .iter()
            .enumerate()
            .try_for_each(|(c, report)| report.ensure_converged(c))
    }
}

enum StepOutcome {
    Skip,
    Step(DVector<f64>),
    Singular,
    Failed(SolverError),
}

/// Solve every column of `problem` from the seed `x0`.
///
/// Each condition iterates independently: its Jacobian is estimated by
/// forward differences, its linear system is solved on its own, and it is
/// frozen as soon as it converges or fails. A condition's result is therefore
/// identical whether it is solved alone or inside a larger batch.
///
/// # Errors
/// Fails the whole call only for setup errors: invalid configuration, an
/// empty batch, or a seed whose shape does not match the problem.
pub fn solve_batch<P: BatchProblem + ?Sized>(
    problem: &P,
    x0: DMatrix<f64>,
    config: &NewtonConfig,
) -> SolverResult<BatchSolution> {
    config.validate()?;
    let n = problem.unknowns();
    let batch = problem.batch_size();
    if n == 0 || batch == 0 {
        return Err(SolverError::ProblemSetup {
            what: "empty batch or system".to_string(),
        });
    }
    if x0.nrows() != n || x0.ncols() != batch {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "seed is {}x{}, problem expects {}x{}",
                x0.nrows(),
                x0.ncols(),
                n,
                batch
            ),
        });
    }

    let mut x = x0;
    let mut reports: Vec<ColumnReport> = (0..batch).map(|_| ColumnReport::pending(n)).collect();
    let mut active = vec![true; batch];
    let mut residuals: Vec<Option<DVector<f64>>> = vec![None; batch];
    let mut batch_evaluations = 1;

    for (c, result) in evaluate_batch(problem, &x, &active).into_iter().enumerate() {
        match result {
            Some(Ok(r)) => {
                let norm = r.norm();
                reports[c].residual_norm = norm;
                reports[c].residual = r.clone();
                if norm < config.trivial_tol {
                    reports[c].status = ConvergenceStatus::Converged;
                    active[c] = false;
                }
                residuals[c] = Some(r);
            }
            Some(Err(e)) => freeze_non_finite(&mut reports[c], &mut active[c], c, e),
            None => {}
        }
    }

    let mut steps = 0;
    while steps < config.max_iterations && active.iter().any(|&a| a) {
        steps += 1;

        let jacobians = forward_difference_batch(problem, &x, &residuals, &active, config.fd_step);
        batch_evaluations += n;

        let outcomes: Vec<StepOutcome> = jacobians
            .into_par_iter()
            .zip(residuals.par_iter())
            .enumerate()
            .map(|(c, (jac, r))| match (jac, r) {
                _ if !active[c] => StepOutcome::Skip,
                (Some(Ok(jac)), Some(r)) => match jac.lu().solve(&(-r)) {
                    Some(dx) if dx.iter().all(|v| v.is_finite()) => StepOutcome::Step(dx),
                    _ => StepOutcome::Singular,
                },
                (Some(Err(e)), _) => StepOutcome::Failed(e),
                _ => StepOutcome::Skip,
            })
            .collect();

        for (c, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                StepOutcome::Skip => {}
                StepOutcome::Step(dx) => {
                    let mut column = x.column_mut(c);
                    column.axpy(config.relaxation, &dx, 1.0);
                    reports[c].iterations = steps;

                    let xc = x.column(c).clone_owned();
                    for violation in problem.physical_violations(c, &xc) {
                        warn!(condition = c, iteration = steps, "{violation}");
                        reports[c]
                            .diagnostics
                            .push(format!("iteration {steps}: {violation}"));
                    }
                }
                StepOutcome::Singular => {
                    warn!(condition = c, iteration = steps, "singular Jacobian, condition frozen");
                    reports[c].status = ConvergenceStatus::SingularJacobian;
                    reports[c]
                        .diagnostics
                        .push(format!("iteration {steps}: singular Jacobian"));
                    active[c] = false;
                }
                StepOutcome::Failed(e) => {
                    freeze_non_finite(&mut reports[c], &mut active[c], c, e);
                }
            }
        }

        batch_evaluations += 1;
        for (c, result) in evaluate_batch(problem, &x, &active).into_iter().enumerate() {
            match result {
                Some(Ok(r)) => {
                    let norm = r.norm();
                    reports[c].residual_norm = norm;
                    reports[c].residual = r.clone();
                    if norm < config.abs_tol {
                        reports[c].status = ConvergenceStatus::Converged;
                        active[c] = false;
                    }
                    residuals[c] = Some(r);
                }
                Some(Err(e)) => freeze_non_finite(&mut reports[c], &mut active[c], c, e),
                None => {}
            }
        }

        let worst = reports
            .iter()
            .zip(&active)
            .filter(|(_, a)| **a)
            .map(|(r, _)| r.residual_norm)
            .fold(0.0_f64, f64::max);
        debug!(
            step = steps,
            active = active.iter().filter(|&&a| a).count(),
            worst_residual = worst,
            "newton step"
        );
    }

    for (c, report) in reports.iter().enumerate() {
        if active[c] {
            warn!(
                condition = c,
                iterations = report.iterations,
                residual = report.residual_norm,
                "iteration budget exhausted"
            );
        }
    }

    Ok(BatchSolution {
        x,
        columns: reports,
        steps,
        batch_evaluations,
    })
}

fn freeze_non_finite(report: &mut ColumnReport, active: &mut bool, column: usize, error: SolverError) {
    warn!(condition = column, error = %error, "condition frozen");
    report.status = ConvergenceStatus::NonFinite;
    report.diagnostics.push(error.to_string());
    *active = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Circle;

    /// x² + y² = 4 and x = y, one radius per column.
    impl BatchProblem for Circle {
        fn unknowns(&self) -> usize {
            2
        }
        fn batch_size(&self) -> usize {
            2
        }
        fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            let radius = 2.0 + column as f64;
            Ok(DVector::from_vec(vec![
                x[0] * x[0] + x[1] * x[1] - radius * radius,
                x[0] - x[1],
            ]))
        }
    }

    #[test]
    fn simple_system_converges() {
        let x0 = DMatrix::from_element(2, 2, 1.0);
        let sol = solve_batch(&Circle, x0, &NewtonConfig::default()).unwrap();

        assert!(sol.all_converged());
        for c in 0..2 {
            let expected = (2.0 + c as f64) / 2.0_f64.sqrt();
            assert!((sol.x[(0, c)] - expected).abs() < 1e-6);
            assert!(sol.columns[c].residual_norm < 1e-6);
        }
    }

    #[test]
    fn exact_seed_takes_no_steps() {
        let r = 2.0 / 2.0_f64.sqrt();
        let s = 3.0 / 2.0_f64.sqrt();
        let x0 = DMatrix::from_column_slice(2, 2, &[r, r, s, s]);
        let sol = solve_batch(&Circle, x0, &NewtonConfig::default()).unwrap();
        assert_eq!(sol.steps, 0);
        assert_eq!(sol.batch_evaluations, 1);
        assert!(sol.columns.iter().all(|c| c.iterations == 0));
    }

    #[test]
    fn rejects_mismatched_seed() {
        let x0 = DMatrix::from_element(2, 3, 1.0);
        assert!(matches!(
            solve_batch(&Circle, x0, &NewtonConfig::default()),
            Err(SolverError::ProblemSetup { .. })
        ));
    }

    #[test]
    fn under_relaxation_needs_more_steps() {
        let x0 = DMatrix::from_element(2, 2, 1.0);
        let full = solve_batch(&Circle, x0.clone(), &NewtonConfig::default()).unwrap();
        let damped = solve_batch(
            &Circle,
            x0,
            &NewtonConfig {
                relaxation: 0.5,
                ..NewtonConfig::default()
            },
        )
        .unwrap();
        assert!(damped.all_converged());
        assert!(damped.columns[0].iterations > full.columns[0].iterations);
    }

    #[test]
    fn budget_exhaustion_reports_not_converged() {
        let x0 = DMatrix::from_element(2, 2, 1.0);
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let sol = solve_batch(&Circle, x0, &config).unwrap();
        assert_eq!(sol.columns[0].status, ConvergenceStatus::NotConverged);
        assert!(matches!(
            sol.ensure_converged(),
            Err(SolverError::NonConvergence { column: 0, iterations: 1, .. })
        ));
    }

    #[test]
    fn invalid_relaxation_is_setup_error() {
        let config = NewtonConfig {
            relaxation: 0.0,
            ..NewtonConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
