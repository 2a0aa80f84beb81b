//! Flight conditions at which the engine is evaluated.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tc_components::StandardAtmosphere;
use tc_core::units::{Length, Pressure, Temperature, k, pa};
use uom::si::length::meter;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

/// Freestream static state, flight Mach number and throttle setting.
///
/// The throttle is the commanded low-spool speed as a fraction of its design
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightCondition {
    pub static_pressure: Pressure,
    pub static_temperature: Temperature,
    pub mach: f64,
    pub throttle: f64,
}

impl FlightCondition {
    pub fn new(
        static_pressure: Pressure,
        static_temperature: Temperature,
        mach: f64,
        throttle: f64,
    ) -> EngineResult<Self> {
        let c = Self {
            static_pressure,
            static_temperature,
            mach,
            throttle,
        };
        c.validate()?;
        Ok(c)
    }

    /// Condition at `altitude` in the standard atmosphere shifted by `delta_isa_k`.
    pub fn from_altitude(
        altitude: Length,
        delta_isa_k: f64,
        mach: f64,
        throttle: f64,
    ) -> EngineResult<Self> {
        let atm = StandardAtmosphere.compute(altitude.get::<meter>(), delta_isa_k)?;
        Self::new(pa(atm.pressure), k(atm.temperature), mach, throttle)
    }

    /// Same freestream at a different throttle setting.
    pub fn with_throttle(&self, throttle: f64) -> Self {
        Self { throttle, ..*self }
    }

    pub fn pressure_pa(&self) -> f64 {
        self.static_pressure.get::<pascal>()
    }

    pub fn temperature_k(&self) -> f64 {
        self.static_temperature.get::<kelvin>()
    }

    pub fn validate(&self) -> EngineResult<()> {
        let p = self.pressure_pa();
        let t = self.temperature_k();
        if !(p.is_finite() && p > 0.0) {
            return Err(EngineError::invalid("static_pressure", p, "must be positive"));
        }
        if !(t.is_finite() && t > 0.0) {
            return Err(EngineError::invalid("static_temperature", t, "must be positive"));
        }
        if !(self.mach.is_finite() && self.mach >= 0.0) {
            return Err(EngineError::invalid("mach", self.mach, "must be non-negative"));
        }
        if !(self.throttle.is_finite() && self.throttle >= 0.0) {
            return Err(EngineError::invalid("throttle", self.throttle, "must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::units::m;

    #[test]
    fn standard_day_sea_level() {
        let c = FlightCondition::from_altitude(m(0.0), 0.0, 0.0, 1.0).unwrap();
        assert!((c.pressure_pa() - 101_325.0).abs() < 1e-6);
        assert!((c.temperature_k() - 288.15).abs() < 1e-9);
    }

    #[test]
    fn rejects_negative_mach() {
        assert!(FlightCondition::new(pa(50_000.0), k(250.0), -0.1, 1.0).is_err());
    }

    #[test]
    fn idle_throttle_is_valid_but_negative_is_not() {
        assert!(FlightCondition::new(pa(50_000.0), k(250.0), 0.5, 0.0).is_ok());
        assert!(FlightCondition::new(pa(50_000.0), k(250.0), 0.5, -0.1).is_err());
        assert!(FlightCondition::new(pa(50_000.0), k(250.0), 0.5, f64::NAN).is_err());
    }

    #[test]
    fn with_throttle_keeps_freestream() {
        let c = FlightCondition::from_altitude(m(8_000.0), 5.0, 0.7, 1.0).unwrap();
        let d = c.with_throttle(0.8);
        assert_eq!(d.static_pressure, c.static_pressure);
        assert_eq!(d.throttle, 0.8);
    }
}
