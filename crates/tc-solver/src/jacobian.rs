//! Finite difference Jacobian computation.

use crate::error::SolverResult;
use crate::problem::{BatchProblem, evaluate_batch};
use nalgebra::{DMatrix, DVector};

/// Perturbation applied to an unknown of magnitude `x`.
pub fn perturbation(x: f64, epsilon: f64) -> f64 {
    epsilon * x.abs().max(1.0)
}

/// Forward-difference Jacobians of every active column.
///
/// For each unknown `j` the whole batch is perturbed in row `j` and evaluated
/// once, so the cost is `unknowns` batch evaluations regardless of the batch
/// size. `base` holds the residuals at `x` for the active columns.
pub fn forward_difference_batch<P: BatchProblem + ?Sized>(
    problem: &P,
    x: &DMatrix<f64>,
    base: &[Option<DVector<f64>>],
    active: &[bool],
    epsilon: f64,
) -> Vec<Option<SolverResult<DMatrix<f64>>>> {
    let n = problem.unknowns();
    let mut jacobians: Vec<Option<SolverResult<DMatrix<f64>>>> = (0..x.ncols())
        .map(|c| match (&base[c], active[c]) {
            (Some(_), true) => Some(Ok(DMatrix::zeros(n, n))),
            _ => None,
        })
        .collect();
    let live: Vec<bool> = jacobians
        .iter()
        .map(|j| matches!(j, Some(Ok(_))))
        .collect();

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let mut steps = vec![0.0; x.ncols()];
        for c in (0..x.ncols()).filter(|&c| live[c]) {
            steps[c] = perturbation(x[(j, c)], epsilon);
            x_perturbed[(j, c)] += steps[c];
        }

        let perturbed = evaluate_batch(problem, &x_perturbed, &live);

        for (c, result) in perturbed.into_iter().enumerate() {
            let (Some(slot), Some(r0)) = (jacobians[c].as_mut(), base[c].as_ref()) else {
                continue;
            };
            match result {
                Some(Ok(r)) => {
                    if let Ok(jac) = slot {
                        let df = (r - r0) / steps[c];
                        jac.set_column(j, &df);
                    }
                }
                Some(Err(e)) => *slot = Err(e),
                None => {}
            }
        }
    }

    jacobians
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quadratic;

    impl BatchProblem for Quadratic {
        fn unknowns(&self) -> usize {
            2
        }
        fn batch_size(&self) -> usize {
            2
        }
        fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            let scale = 1.0 + column as f64;
            Ok(DVector::from_vec(vec![
                scale * x[0] * x[0],
                x[0] * x[1],
            ]))
        }
    }

    #[test]
    fn batch_jacobian_matches_analytic() {
        let x = DMatrix::from_column_slice(2, 2, &[3.0, 2.0, -1.5, 4.0]);
        let active = [true, true];
        let base: Vec<Option<DVector<f64>>> = evaluate_batch(&Quadratic, &x, &active)
            .into_iter()
            .map(|r| r.and_then(Result::ok))
            .collect();

        let jacs = forward_difference_batch(&Quadratic, &x, &base, &active, 1e-7);
        for c in 0..2 {
            let jac = jacs[c].as_ref().unwrap().as_ref().unwrap();
            let (a, b) = (x[(0, c)], x[(1, c)]);
            let scale = 1.0 + c as f64;
            assert!((jac[(0, 0)] - 2.0 * scale * a).abs() < 1e-4);
            assert!(jac[(0, 1)].abs() < 1e-12);
            assert!((jac[(1, 0)] - b).abs() < 1e-4);
            assert!((jac[(1, 1)] - a).abs() < 1e-4);
        }
    }

    #[test]
    fn inactive_columns_are_skipped() {
        let x = DMatrix::from_element(2, 2, 1.0);
        let active = [false, true];
        let base: Vec<Option<DVector<f64>>> = evaluate_batch(&Quadratic, &x, &active)
            .into_iter()
            .map(|r| r.and_then(Result::ok))
            .collect();
        let jacs = forward_difference_batch(&Quadratic, &x, &base, &active, 1e-8);
        assert!(jacs[0].is_none());
        assert!(jacs[1].is_some());
    }
}
