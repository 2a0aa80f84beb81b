//! Installed-free thrust bookkeeping for a separate-flow turbofan.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

/// Flow and velocity inputs for one thrust evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustInputs {
    /// Core air mass flow (kg/s)
    pub core_mass_flow: f64,
    /// Bypass ratio `mdot_fan / mdot_core`
    pub bypass_ratio: f64,
    /// Fuel-to-air ratio
    pub fuel_fraction: f64,
    /// Flight speed (m/s)
    pub flight_speed: f64,
    /// Freestream speed of sound (m/s)
    pub speed_of_sound: f64,
    /// Core nozzle exit speed (m/s)
    pub core_exit_speed: f64,
    /// Fan nozzle exit speed (m/s)
    pub fan_exit_speed: f64,
}

/// Net thrust and derived efficiency figures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustReport {
    /// Net thrust (N)
    pub thrust: f64,
    /// Fuel mass flow (kg/s)
    pub fuel_flow: f64,
    /// `F / ((1+α)·mdot_core·a0)`
    pub specific_thrust: f64,
    /// Thrust-specific fuel consumption (kg/(N·s)); infinite at zero thrust
    pub tsfc: f64,
    /// Specific impulse (s); zero with no fuel
    pub specific_impulse: f64,
}

/// Fully-expanded momentum balance:
///
/// ```text
/// F = mdot_core · ((1+f)·u6 - u0 + α·(u8 - u0))
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Thrust {
    /// Standard gravity used for specific impulse (m/s²)
    pub g0: f64,
}

impl Default for Thrust {
    fn default() -> Self {
        Self {
            g0: tc_core::units::constants::G0_MPS2,
        }
    }
}

impl Thrust {
    pub fn evaluate(&self, input: &ThrustInputs) -> ComponentResult<ThrustReport> {
        check_finite(input.core_mass_flow, "core mass flow")?;
        check_finite(input.core_exit_speed, "core exit speed")?;
        check_finite(input.fan_exit_speed, "fan exit speed")?;
        if !(input.speed_of_sound > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "speed of sound must be positive",
            });
        }

        let f = input.fuel_fraction;
        let alpha = input.bypass_ratio;
        let u0 = input.flight_speed;
        let thrust = input.core_mass_flow
            * ((1.0 + f) * input.core_exit_speed - u0 + alpha * (input.fan_exit_speed - u0));
        let fuel_flow = f * input.core_mass_flow;

        let total_air = (1.0 + alpha) * input.core_mass_flow;
        let specific_thrust = if total_air != 0.0 {
            thrust / (total_air * input.speed_of_sound)
        } else {
            0.0
        };
        let tsfc = if thrust != 0.0 {
            fuel_flow / thrust
        } else {
            f64::INFINITY
        };
        let specific_impulse = if fuel_flow != 0.0 {
            thrust / (fuel_flow * self.g0)
        } else {
            0.0
        };

        Ok(ThrustReport {
            thrust,
            fuel_flow,
            specific_thrust,
            tsfc,
            specific_impulse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cruise() -> ThrustInputs {
        ThrustInputs {
            core_mass_flow: 20.0,
            bypass_ratio: 5.0,
            fuel_fraction: 0.02,
            flight_speed: 230.0,
            speed_of_sound: 299.0,
            core_exit_speed: 600.0,
            fan_exit_speed: 330.0,
        }
    }

    #[test]
    fn momentum_balance() {
        let r = Thrust::default().evaluate(&cruise()).unwrap();
        let expected = 20.0 * (1.02 * 600.0 - 230.0 + 5.0 * (330.0 - 230.0));
        assert!((r.thrust - expected).abs() < 1e-9);
        assert!((r.fuel_flow - 0.4).abs() < 1e-12);
        assert!((r.tsfc - 0.4 / expected).abs() < 1e-15);
        assert!((r.specific_thrust - expected / (120.0 * 299.0)).abs() < 1e-12);
    }

    #[test]
    fn isp_and_tsfc_are_reciprocal() {
        let t = Thrust::default();
        let r = t.evaluate(&cruise()).unwrap();
        assert!((r.specific_impulse * r.tsfc * t.g0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_thrust_gives_infinite_tsfc() {
        let mut input = cruise();
        input.core_exit_speed = 230.0 / 1.02;
        input.fan_exit_speed = 230.0;
        let r = Thrust::default().evaluate(&input).unwrap();
        assert!(r.thrust.abs() < 1e-9);
        assert!(r.tsfc.is_infinite() || r.tsfc.abs() > 1.0);
    }
}
