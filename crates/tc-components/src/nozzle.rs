//! Convergent-divergent exhaust nozzle expanded to ambient pressure.

use crate::common::{TotalState, check_finite};
use crate::duct::Duct;
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use crate::traits::FlowComponent;

/// Static exit conditions after full expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitState {
    /// Static temperature (K)
    pub static_temperature: f64,
    /// Static pressure (Pa), equal to ambient
    pub static_pressure: f64,
    /// Exit velocity (m/s)
    pub flow_speed: f64,
    /// Static density (kg/m³)
    pub static_density: f64,
}

impl ExitState {
    /// Mass flux `ρ·u` (kg/(s·m²)).
    pub fn mass_flux(&self) -> f64 {
        self.static_density * self.flow_speed
    }
}

/// Nozzle: adiabatic total-pressure loss, then isentropic expansion to `P0`.
///
/// ```text
/// T   = Tt · (P0/Pt)^((γ-1)/γ)
/// u   = sign(Tt - T) · sqrt(2·cp·|Tt - T|)
/// rho = P0 / (R·T)
/// ```
///
/// When `Pt < P0` the exit is hotter than total and the speed is negative.
/// The mass flux is continuous and strictly increasing in `Pt` through `P0`.
#[derive(Clone, Debug)]
pub struct Nozzle {
    duct: Duct,
}

impl Nozzle {
    pub fn new(name: impl Into<String>, pressure_ratio: f64) -> ComponentResult<Self> {
        Ok(Self {
            duct: Duct::new(name, pressure_ratio)?,
        })
    }

    pub fn pressure_ratio(&self) -> f64 {
        self.duct.pressure_ratio
    }

    pub fn expand_to_ambient(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        ambient_pressure: f64,
    ) -> ComponentResult<ExitState> {
        let exit_total = self.duct.flow(gas, inlet)?;
        expand(gas, &exit_total, ambient_pressure)
    }

    /// Throat-free exit area passing `mass_flow` at `exit`.
    pub fn exit_area(&self, mass_flow: f64, exit: &ExitState) -> ComponentResult<f64> {
        let flux = exit.mass_flux();
        if !(flux > 0.0) || !(mass_flow > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "nozzle sizing needs positive mass flow and exit flux",
            });
        }
        let area = mass_flow / flux;
        check_finite(area, "nozzle exit area")?;
        Ok(area)
    }
}

/// Isentropic expansion of a total state to `ambient_pressure`.
pub fn expand(
    gas: &PerfectGas,
    total: &TotalState,
    ambient_pressure: f64,
) -> ComponentResult<ExitState> {
    total.check("nozzle exit total state")?;
    check_finite(ambient_pressure, "ambient pressure")?;
    if ambient_pressure <= 0.0 {
        return Err(ComponentError::NonPhysical {
            what: "ambient pressure must be positive",
        });
    }

    let t = total.temperature * (ambient_pressure / total.pressure).powf(gas.isentropic_exponent());
    let dt = total.temperature - t;
    let u = (2.0 * gas.cp() * dt.abs()).sqrt().copysign(dt);
    Ok(ExitState {
        static_temperature: t,
        static_pressure: ambient_pressure,
        flow_speed: u,
        static_density: gas.density(ambient_pressure, t),
    })
}

impl FlowComponent for Nozzle {
    fn name(&self) -> &str {
        self.duct.name()
    }

    fn compute(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        _control: f64,
    ) -> ComponentResult<TotalState> {
        self.duct.flow(gas, inlet)
    }
}
