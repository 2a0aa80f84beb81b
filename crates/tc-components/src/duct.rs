//! Adiabatic duct with total-pressure loss (inlet diffuser, bypass duct).

use crate::common::TotalState;
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use crate::traits::FlowComponent;
use tc_core::numeric::ensure_unit_fraction;

/// Passive duct: no work, no heat, so total temperature is conserved and
/// only total pressure drops by the recovery ratio.
#[derive(Clone, Debug)]
pub struct Duct {
    pub name: String,
    /// Design total-pressure recovery (0 < pi <= 1)
    pub pressure_ratio: f64,
}

impl Duct {
    pub fn new(name: impl Into<String>, pressure_ratio: f64) -> ComponentResult<Self> {
        ensure_unit_fraction(pressure_ratio, "duct pressure recovery")?;
        Ok(Self {
            name: name.into(),
            pressure_ratio,
        })
    }

    /// Outlet state at the duct's own design recovery.
    pub fn flow(&self, gas: &PerfectGas, inlet: &TotalState) -> ComponentResult<TotalState> {
        self.compute(gas, inlet, self.pressure_ratio)
    }
}

impl FlowComponent for Duct {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        _gas: &PerfectGas,
        inlet: &TotalState,
        control: f64,
    ) -> ComponentResult<TotalState> {
        inlet.check("duct inlet")?;
        if !(control > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "duct pressure ratio must be positive",
            });
        }
        Ok(TotalState {
            temperature: inlet.temperature,
            pressure: inlet.pressure * control,
            enthalpy: inlet.enthalpy,
        })
    }
}
