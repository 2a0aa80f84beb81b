//! Core trait for component models.

use crate::common::TotalState;
use crate::error::ComponentResult;
use crate::gas::PerfectGas;

/// A station-to-station element of the engine flow path.
///
/// Components are pure functions of the inlet total state and one control
/// input; they hold only their fixed design constants, never per-call state,
/// so a single instance can be evaluated for every condition of a batch.
pub trait FlowComponent: Send + Sync {
    /// Component name for debugging and identification.
    fn name(&self) -> &str;

    /// Compute the outlet total state.
    ///
    /// The meaning of `control` is component specific:
    /// - ducts, nozzles and compressors: total pressure ratio `Pt_out / Pt_in`
    /// - combustors: turbine inlet (outlet total) temperature in K
    /// - turbines: required specific enthalpy change in J/kg (negative for work extraction)
    ///
    /// # Errors
    /// Returns an error if the inlet state or control input is non-physical.
    fn compute(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        control: f64,
    ) -> ComponentResult<TotalState>;
}
