//! Freestream capture: static conditions and flight Mach to total state.

use crate::common::{TotalState, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;

/// Total state of the captured stream plus the freestream kinematics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RamOutput {
    pub total: TotalState,
    /// Freestream speed of sound (m/s)
    pub speed_of_sound: f64,
    /// Flight speed (m/s)
    pub velocity: f64,
}

/// Isentropic ram compression of the freestream.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ram;

impl Ram {
    pub fn compute(
        &self,
        gas: &PerfectGas,
        static_temperature: f64,
        static_pressure: f64,
        mach: f64,
    ) -> ComponentResult<RamOutput> {
        check_finite(static_temperature, "freestream temperature")?;
        check_finite(static_pressure, "freestream pressure")?;
        check_finite(mach, "flight Mach number")?;
        if static_temperature <= 0.0 || static_pressure <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "freestream temperature and pressure must be positive",
            });
        }
        if mach < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "flight Mach number cannot be negative",
            });
        }

        let ratio = gas.stagnation_ratio(mach);
        let tt = static_temperature * ratio;
        let pt = static_pressure * ratio.powf(1.0 / gas.isentropic_exponent());
        let a0 = gas.speed_of_sound(static_temperature);

        Ok(RamOutput {
            total: TotalState::from_tp(gas, tt, pt),
            speed_of_sound: a0,
            velocity: mach * a0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_freestream_is_unchanged() {
        let gas = PerfectGas::air();
        let out = Ram.compute(&gas, 288.15, 101_325.0, 0.0).unwrap();
        assert_eq!(out.total.temperature, 288.15);
        assert_eq!(out.total.pressure, 101_325.0);
        assert_eq!(out.velocity, 0.0);
    }

    #[test]
    fn total_enthalpy_gains_kinetic_energy() {
        let gas = PerfectGas::air();
        let out = Ram.compute(&gas, 223.25, 26_436.0, 0.8).unwrap();
        let expected = gas.enthalpy(223.25) + 0.5 * out.velocity * out.velocity;
        assert!((out.total.enthalpy - expected).abs() < 1e-6 * expected);
        assert!(out.total.pressure > 26_436.0 * 1.5);
    }

    #[test]
    fn rejects_negative_mach() {
        let gas = PerfectGas::air();
        assert!(Ram.compute(&gas, 288.15, 101_325.0, -0.1).is_err());
    }
}
