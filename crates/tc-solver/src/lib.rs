//! Batched Newton solver for square nonlinear systems.
//!
//! The unknowns of N independent conditions are stored as the columns of an
//! `(n, N)` matrix. Every Newton step estimates each condition's Jacobian by
//! forward differences (one batch evaluation per unknown), solves the `n×n`
//! systems in parallel, and applies a fixed relaxation factor. Conditions are
//! frozen as soon as they converge or fail, and each reports its own status.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod problem;

pub use error::{SolverError, SolverResult};
pub use newton::{BatchSolution, ColumnReport, ConvergenceStatus, NewtonConfig, solve_batch};
pub use problem::{BatchProblem, evaluate_batch};
