//! tc-engine: two-spool separate-flow turbofan sizing and off-design matching.
//!
//! A [`Turbofan`] is built from a [`TurbofanConfig`], sized once at its design
//! point, and then evaluated at batches of [`FlightCondition`]s. Each
//! off-design evaluation solves eight matching residuals per condition with
//! the batched Newton solver from `tc-solver`.
//!
//! # Example
//!
//! ```no_run
//! use tc_core::units::m;
//! use tc_engine::{FlightCondition, Turbofan, TurbofanConfig};
//!
//! let mut engine = Turbofan::new(TurbofanConfig::default()).unwrap();
//! engine.size().unwrap();
//!
//! let cruise = FlightCondition::from_altitude(m(10_000.0), 0.0, 0.5, 1.0).unwrap();
//! let solution = engine.offdesign(&[cruise], None).unwrap();
//! for point in &solution.points {
//!     println!("{:?}: {:?}", point.outcome.status, point.performance);
//! }
//! ```

pub mod condition;
pub mod config;
pub mod cycle;
pub mod error;
pub mod network;
pub mod params;
pub mod results;

pub use condition::FlightCondition;
pub use config::{TurbofanConfig, load_yaml, save_yaml};
pub use error::{EngineError, EngineResult};
pub use network::{MAX_MATCHED_THROTTLE, MIN_MATCHED_THROTTLE, Turbofan};
pub use params::{BASELINE_LEN, BaselineParameters, DesignParameters, OffdesignParameters};
pub use results::{
    CyclePerformance, OffdesignSolution, OperatingPoint, SizingReport, SolveOutcome,
    ThrustEvaluation, ThrustSchedule,
};
pub use tc_solver::{ConvergenceStatus, NewtonConfig};
