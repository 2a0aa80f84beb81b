//! Constant-pressure-loss combustor.

use crate::common::{TotalState, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use crate::traits::FlowComponent;
use tc_core::numeric::{ensure_positive, ensure_unit_fraction};

/// Outlet state plus fuel consumption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombustorOutput {
    pub outlet: TotalState,
    /// Fuel-to-air mass ratio `f`
    pub fuel_fraction: f64,
}

/// Burner that raises the stream to a commanded turbine inlet temperature.
///
/// ```text
/// Pt4 = pi_b · Pt3
/// f   = cp·(Tt4 - Tt3) / (eta_b·h_PR - cp·Tt4)
/// ```
#[derive(Clone, Debug)]
pub struct Combustor {
    pub name: String,
    /// Total-pressure ratio across the liner (0 < pi <= 1)
    pub pressure_ratio: f64,
    /// Combustion efficiency (0 < eta <= 1)
    pub efficiency: f64,
    /// Fuel lower heating value (J/kg)
    pub fuel_specific_energy: f64,
}

impl Combustor {
    pub fn new(
        name: impl Into<String>,
        pressure_ratio: f64,
        efficiency: f64,
        fuel_specific_energy: f64,
    ) -> ComponentResult<Self> {
        ensure_unit_fraction(pressure_ratio, "combustor pressure ratio")?;
        ensure_unit_fraction(efficiency, "combustor efficiency")?;
        ensure_positive(fuel_specific_energy, "fuel specific energy")?;
        Ok(Self {
            name: name.into(),
            pressure_ratio,
            efficiency,
            fuel_specific_energy,
        })
    }

    /// Heat the stream to `turbine_inlet_temperature`.
    pub fn burn(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        turbine_inlet_temperature: f64,
    ) -> ComponentResult<CombustorOutput> {
        inlet.check("combustor inlet")?;
        check_finite(turbine_inlet_temperature, "turbine inlet temperature")?;
        if turbine_inlet_temperature <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "turbine inlet temperature must be positive",
            });
        }

        let outlet = TotalState::from_tp(
            gas,
            turbine_inlet_temperature,
            inlet.pressure * self.pressure_ratio,
        );
        let available = self.efficiency * self.fuel_specific_energy - outlet.enthalpy;
        if available <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "fuel heating value cannot reach turbine inlet temperature",
            });
        }
        let fuel_fraction = (outlet.enthalpy - inlet.enthalpy) / available;

        Ok(CombustorOutput {
            outlet,
            fuel_fraction,
        })
    }
}

impl FlowComponent for Combustor {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        control: f64,
    ) -> ComponentResult<TotalState> {
        Ok(self.burn(gas, inlet, control)?.outlet)
    }
}
