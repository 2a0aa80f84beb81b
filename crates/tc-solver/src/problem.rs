//! Batch problem definition for the column-wise Newton solver.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// A square nonlinear system posed independently for each column of a batch.
///
/// The iterate is an `(unknowns, batch_size)` matrix; column `c` holds the
/// unknowns of condition `c`. Residuals of one column must depend only on that
/// column's unknowns, so columns can be evaluated in parallel and solved
/// without coupling.
pub trait BatchProblem: Sync {
    /// Number of unknowns (and residual rows) per condition.
    fn unknowns(&self) -> usize;

    /// Number of independent conditions.
    fn batch_size(&self) -> usize;

    /// Residual of condition `column` at unknowns `x`.
    ///
    /// # Errors
    /// Returns an error if the model cannot be evaluated at `x`; the solver
    /// freezes that condition and reports it as non-finite.
    fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>>;

    /// Human-readable descriptions of unknowns outside their physical range.
    ///
    /// Violations are diagnostics only; the iteration continues.
    fn physical_violations(&self, _column: usize, _x: &DVector<f64>) -> Vec<String> {
        Vec::new()
    }
}

/// Evaluate the residual of every active column of `x` in parallel.
///
/// Inactive columns yield `None`. A residual of the wrong length or with a
/// non-finite entry is reported as [`SolverError::NonFinite`].
pub fn evaluate_batch<P: BatchProblem + ?Sized>(
    problem: &P,
    x: &DMatrix<f64>,
    active: &[bool],
) -> Vec<Option<SolverResult<DVector<f64>>>> {
    let n = problem.unknowns();
    (0..x.ncols())
        .into_par_iter()
        .map(|column| {
            if !active[column] {
                return None;
            }
            let xc = x.column(column).clone_owned();
            Some(problem.residual_column(column, &xc).and_then(|r| {
                if r.len() != n {
                    return Err(SolverError::NonFinite {
                        column,
                        what: format!("residual has {} rows, expected {}", r.len(), n),
                    });
                }
                if let Some(row) = r.iter().position(|v| !v.is_finite()) {
                    return Err(SolverError::NonFinite {
                        column,
                        what: format!("residual row {} is {}", row + 1, r[row]),
                    });
                }
                Ok(r)
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shifted;

    impl BatchProblem for Shifted {
        fn unknowns(&self) -> usize {
            2
        }
        fn batch_size(&self) -> usize {
            3
        }
        fn residual_column(&self, column: usize, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
            let shift = column as f64;
            if column == 2 {
                return Ok(DVector::from_vec(vec![f64::NAN, 0.0]));
            }
            Ok(DVector::from_vec(vec![x[0] - shift, x[1] + shift]))
        }
    }

    #[test]
    fn evaluates_only_active_columns() {
        let x = DMatrix::from_element(2, 3, 1.0);
        let out = evaluate_batch(&Shifted, &x, &[true, false, true]);
        assert!(out[1].is_none());
        let r0 = out[0].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(r0[0], 1.0);
        assert!(matches!(
            out[2],
            Some(Err(SolverError::NonFinite { column: 2, .. }))
        ));
    }
}
