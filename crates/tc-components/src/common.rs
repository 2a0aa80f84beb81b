//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use tc_core::numeric::ensure_finite;

/// Stagnation (total) state of a gas stream at a station.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TotalState {
    /// Total temperature (K)
    pub temperature: f64,
    /// Total pressure (Pa)
    pub pressure: f64,
    /// Total specific enthalpy (J/kg)
    pub enthalpy: f64,
}

impl TotalState {
    /// Build a state from temperature and pressure, deriving enthalpy from `gas`.
    pub fn from_tp(gas: &PerfectGas, temperature: f64, pressure: f64) -> Self {
        Self {
            temperature,
            pressure,
            enthalpy: gas.enthalpy(temperature),
        }
    }

    /// Reject states with non-finite or non-positive temperature/pressure.
    pub fn check(&self, what: &'static str) -> ComponentResult<()> {
        check_finite(self.temperature, what)?;
        check_finite(self.pressure, what)?;
        check_finite(self.enthalpy, what)?;
        if self.temperature <= 0.0 || self.pressure <= 0.0 {
            return Err(ComponentError::NonPhysical { what });
        }
        Ok(())
    }
}

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn state_check_rejects_negative_pressure() {
        let gas = PerfectGas::air();
        assert!(TotalState::from_tp(&gas, 300.0, 1.0e5).check("inlet").is_ok());
        assert!(TotalState::from_tp(&gas, 300.0, -1.0).check("inlet").is_err());
        assert!(TotalState::from_tp(&gas, f64::NAN, 1.0e5).check("inlet").is_err());
    }
}
