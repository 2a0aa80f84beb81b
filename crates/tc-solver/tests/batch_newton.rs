//! Integration tests for the batched Newton solver.

use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tc_solver::{
    BatchProblem, ConvergenceStatus, NewtonConfig, SolverError, SolverResult, solve_batch,
};

/// Column 0: regular 2x2 system. Column 1: residual independent of x[1],
/// so its Jacobian has an exact zero column.
struct MixedBatch;

impl BatchProblem for MixedBatch {
    fn unknowns(&self) -> usize {
        2
    }
    fn batch_size(&self) -> usize {
        2
    }
    fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        Ok(match column {
            0 => DVector::from_vec(vec![x[0] - 1.0, x[0] * x[1] - 2.0]),
            _ => DVector::from_vec(vec![x[0] - 1.0, x[0] * x[0] - 1.0]),
        })
    }
}

#[test]
fn singular_condition_does_not_block_others() {
    let x0 = DMatrix::from_element(2, 2, 3.0);
    let sol = solve_batch(&MixedBatch, x0, &NewtonConfig::default()).unwrap();

    assert_eq!(sol.columns[0].status, ConvergenceStatus::Converged);
    assert!((sol.x[(1, 0)] - 2.0).abs() < 1e-6);

    assert_eq!(sol.columns[1].status, ConvergenceStatus::SingularJacobian);
    assert_eq!(sol.columns[1].iterations, 0);
    assert!(matches!(
        sol.ensure_converged(),
        Err(SolverError::SingularJacobian { column: 1, iteration: 1 })
    ));
}

/// Decoupled exponential system that counts batch-level evaluations.
struct Counting {
    targets: Vec<f64>,
    calls: AtomicUsize,
}

impl BatchProblem for Counting {
    fn unknowns(&self) -> usize {
        3
    }
    fn batch_size(&self) -> usize {
        self.targets.len()
    }
    fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        if column == 0 {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
        let t = self.targets[column];
        Ok(DVector::from_vec(vec![
            x[0].exp() - t,
            x[1] - 0.5 * x[0],
            x[2] * x[2] * x[2] - x[1] - t,
        ]))
    }
}

#[test]
fn jacobian_costs_one_batch_evaluation_per_unknown() {
    let problem = Counting {
        targets: vec![2.0, 2.0, 2.0, 2.0],
        calls: AtomicUsize::new(0),
    };
    let x0 = DMatrix::from_element(3, 4, 1.0);
    let sol = solve_batch(&problem, x0, &NewtonConfig::default()).unwrap();

    assert!(sol.all_converged());
    assert!(sol.steps > 1);
    assert_eq!(sol.batch_evaluations, 1 + sol.steps * (3 + 1));
    assert_eq!(problem.calls.load(Ordering::Relaxed), sol.batch_evaluations);
}

#[test]
fn batched_results_equal_individual_solves() {
    let targets = vec![1.5, 2.0, 4.0, 7.5];
    let batch = Counting {
        targets: targets.clone(),
        calls: AtomicUsize::new(0),
    };
    let x0 = DMatrix::from_element(3, targets.len(), 0.8);
    let all = solve_batch(&batch, x0, &NewtonConfig::default()).unwrap();

    for (c, &t) in targets.iter().enumerate() {
        let single = Counting {
            targets: vec![t],
            calls: AtomicUsize::new(0),
        };
        let one = solve_batch(&single, DMatrix::from_element(3, 1, 0.8), &NewtonConfig::default())
            .unwrap();
        assert_eq!(one.x.column(0), all.x.column(c));
        assert_eq!(one.columns[0].iterations, all.columns[c].iterations);
        assert_eq!(one.columns[0].residual_norm, all.columns[c].residual_norm);
    }
}

#[test]
fn resolve_from_converged_seed_is_idempotent() {
    let problem = Counting {
        targets: vec![3.0, 5.0],
        calls: AtomicUsize::new(0),
    };
    let first = solve_batch(&problem, DMatrix::from_element(3, 2, 1.0), &NewtonConfig::default())
        .unwrap();
    let second = solve_batch(&problem, first.x.clone(), &NewtonConfig::default()).unwrap();
    assert!(second.all_converged());
    assert!(second.columns.iter().all(|c| c.iterations <= 1));
}

/// Root at x = -3 while the unknown is meant to stay positive.
struct NegativeRoot;

impl BatchProblem for NegativeRoot {
    fn unknowns(&self) -> usize {
        1
    }
    fn batch_size(&self) -> usize {
        1
    }
    fn residual_column(&self, _column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, x[0] + 3.0))
    }
    fn physical_violations(&self, _column: usize, x: &DVector<f64>) -> Vec<String> {
        if x[0] <= 0.0 {
            vec![format!("unknown must be positive, got {}", x[0])]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn physical_violation_is_diagnostic_only() {
    let sol = solve_batch(&NegativeRoot, DMatrix::from_element(1, 1, 1.0), &NewtonConfig::default())
        .unwrap();
    assert_eq!(sol.columns[0].status, ConvergenceStatus::Converged);
    assert!((sol.x[(0, 0)] + 3.0).abs() < 1e-6);
    assert!(sol.columns[0].residual_norm < 1e-6);
    assert_eq!(sol.columns[0].diagnostics.len(), 1);
    assert!(sol.columns[0].diagnostics[0].contains("positive"));
}

/// Column 1 fails to evaluate once it leaves the domain of the logarithm.
struct Failing;

impl BatchProblem for Failing {
    fn unknowns(&self) -> usize {
        1
    }
    fn batch_size(&self) -> usize {
        2
    }
    fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let r = if column == 0 { x[0] - 2.0 } else { x[0].ln() + 10.0 * x[0] };
        if x[0] < 0.0 && column == 1 {
            return Err(SolverError::Numeric {
                what: "log of negative value".to_string(),
            });
        }
        Ok(DVector::from_element(1, r))
    }
}

#[test]
fn failing_condition_is_frozen_as_non_finite() {
    // From x = 5 the first step of column 1 lands below zero.
    let sol = solve_batch(&Failing, DMatrix::from_element(1, 2, 5.0), &NewtonConfig::default())
        .unwrap();
    assert_eq!(sol.columns[0].status, ConvergenceStatus::Converged);
    assert_eq!(sol.columns[1].status, ConvergenceStatus::NonFinite);
    assert!(!sol.columns[1].diagnostics.is_empty());
}

proptest! {
    #[test]
    fn converged_conditions_meet_tolerance(t in 0.5f64..20.0, seed in 0.2f64..2.0) {
        let problem = Counting { targets: vec![t], calls: AtomicUsize::new(0) };
        let sol = solve_batch(&problem, DMatrix::from_element(3, 1, seed), &NewtonConfig::default()).unwrap();
        let report = &sol.columns[0];
        if report.status.is_converged() {
            prop_assert!(report.residual_norm < 1e-6);
        }
    }
}
