//! Calorically perfect working gas.
//!
//! The cycle treats air and combustion products alike: ideal-gas equation of
//! state with constant `cp`, so `h = cp·T` and isentropic relations are closed
//! form.

use crate::error::{ComponentError, ComponentResult};

/// Constant-property gas used by every station of the cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfectGas {
    /// Ratio of specific heats
    pub gamma: f64,
    /// Specific gas constant (J/(kg·K))
    pub gas_constant: f64,
}

impl Default for PerfectGas {
    fn default() -> Self {
        Self::air()
    }
}

impl PerfectGas {
    /// Air with γ = 1.4 and R = 287.87 J/(kg·K).
    pub fn air() -> Self {
        Self {
            gamma: 1.4,
            gas_constant: 287.87,
        }
    }

    /// Create a gas, rejecting non-physical constants.
    pub fn new(gamma: f64, gas_constant: f64) -> ComponentResult<Self> {
        if !(gamma > 1.0) || !gamma.is_finite() {
            return Err(ComponentError::InvalidArg {
                what: "gamma must be finite and greater than 1",
            });
        }
        if !(gas_constant > 0.0) || !gas_constant.is_finite() {
            return Err(ComponentError::InvalidArg {
                what: "gas constant must be positive",
            });
        }
        Ok(Self {
            gamma,
            gas_constant,
        })
    }

    /// Specific heat at constant pressure (J/(kg·K)).
    pub fn cp(&self) -> f64 {
        self.gamma * self.gas_constant / (self.gamma - 1.0)
    }

    /// `(γ-1)/γ`, the isentropic temperature/pressure exponent.
    pub fn isentropic_exponent(&self) -> f64 {
        (self.gamma - 1.0) / self.gamma
    }

    /// Specific enthalpy at `temperature` (J/kg, zero at 0 K).
    pub fn enthalpy(&self, temperature: f64) -> f64 {
        self.cp() * temperature
    }

    pub fn speed_of_sound(&self, temperature: f64) -> f64 {
        (self.gamma * self.gas_constant * temperature).sqrt()
    }

    pub fn density(&self, pressure: f64, temperature: f64) -> f64 {
        pressure / (self.gas_constant * temperature)
    }

    /// Total-to-static temperature ratio `1 + (γ-1)/2·M²`.
    pub fn stagnation_ratio(&self, mach: f64) -> f64 {
        1.0 + 0.5 * (self.gamma - 1.0) * mach * mach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_cp() {
        let gas = PerfectGas::air();
        assert!((gas.cp() - 1007.545).abs() < 1e-9);
    }

    #[test]
    fn rejects_subunity_gamma() {
        assert!(PerfectGas::new(0.9, 287.0).is_err());
        assert!(PerfectGas::new(1.4, -1.0).is_err());
        assert!(PerfectGas::new(1.3, 290.0).is_ok());
    }

    #[test]
    fn sea_level_speed_of_sound() {
        let a = PerfectGas::air().speed_of_sound(288.15);
        assert!((a - 340.5).abs() < 0.5);
    }
}
