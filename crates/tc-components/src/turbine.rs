//! Cooled-free axial turbine model.

use crate::common::{TotalState, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use crate::traits::FlowComponent;
use tc_core::numeric::ensure_unit_fraction;

/// Turbine stage group driving one spool.
///
/// ## Model
///
/// Work extraction is specified as a required specific enthalpy change
/// `Δh` (negative), set by the power the spool's compressors absorb:
///
/// ```text
/// Tt_out = Tt_in + Δh / cp
/// Pt_out = Pt_in · (Tt_out / Tt_in)^(γ / ((γ-1)·eta_pol))
/// ```
///
/// The inverse form, used when the total-pressure ratio is known instead,
/// is [`Turbine::expand_by_pressure_ratio`]:
///
/// ```text
/// Tt_out = Tt_in · pi^((γ-1)·eta_pol / γ)
/// ```
#[derive(Clone, Debug)]
pub struct Turbine {
    pub name: String,
    /// Polytropic efficiency (0 < eta <= 1)
    pub polytropic_efficiency: f64,
    /// Shaft mechanical efficiency (0 < eta <= 1)
    pub mechanical_efficiency: f64,
}

impl Turbine {
    /// Create a new turbine.
    ///
    /// # Errors
    /// Returns error if either efficiency is outside `(0,1]`.
    pub fn new(
        name: impl Into<String>,
        polytropic_efficiency: f64,
        mechanical_efficiency: f64,
    ) -> ComponentResult<Self> {
        ensure_unit_fraction(polytropic_efficiency, "turbine polytropic efficiency")?;
        ensure_unit_fraction(mechanical_efficiency, "turbine mechanical efficiency")?;
        Ok(Self {
            name: name.into(),
            polytropic_efficiency,
            mechanical_efficiency,
        })
    }

    /// Enthalpy change per unit turbine flow needed to supply `absorbed_work`
    /// (J per kg of core air) with fuel fraction `fuel_fraction`.
    pub fn required_enthalpy_drop(&self, absorbed_work: f64, fuel_fraction: f64) -> f64 {
        -absorbed_work / ((1.0 + fuel_fraction) * self.mechanical_efficiency)
    }

    /// Expand by a known enthalpy change (`delta_h < 0`).
    pub fn expand_by_enthalpy(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        delta_h: f64,
    ) -> ComponentResult<TotalState> {
        inlet.check("turbine inlet")?;
        check_finite(delta_h, "turbine enthalpy drop")?;

        let tt = inlet.temperature + delta_h / gas.cp();
        if tt <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "turbine work exceeds available enthalpy",
            });
        }
        let exponent = 1.0 / (gas.isentropic_exponent() * self.polytropic_efficiency);
        let pt = inlet.pressure * (tt / inlet.temperature).powf(exponent);

        Ok(TotalState {
            temperature: tt,
            pressure: pt,
            enthalpy: inlet.enthalpy + delta_h,
        })
    }

    /// Expand by a known total-pressure ratio `pi = Pt_out / Pt_in`.
    pub fn expand_by_pressure_ratio(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        pressure_ratio: f64,
    ) -> ComponentResult<TotalState> {
        inlet.check("turbine inlet")?;
        check_finite(pressure_ratio, "turbine pressure ratio")?;
        if pressure_ratio <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "turbine pressure ratio must be positive",
            });
        }
        let exponent = gas.isentropic_exponent() * self.polytropic_efficiency;
        let tt = inlet.temperature * pressure_ratio.powf(exponent);
        Ok(TotalState::from_tp(gas, tt, inlet.pressure * pressure_ratio))
    }
}

impl FlowComponent for Turbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        control: f64,
    ) -> ComponentResult<TotalState> {
        self.expand_by_enthalpy(gas, inlet, control)
    }
}
