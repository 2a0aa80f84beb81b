//! US Standard Atmosphere 1976, 0–47 km.
//!
//! Geometric altitude is converted to geopotential altitude, then temperature
//! and pressure follow the piecewise-linear lapse-rate layers. An optional
//! temperature offset shifts the temperature profile without changing pressure.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

/// Specific gas constant of dry air used by the 1976 standard (J/(kg·K)).
const R_AIR: f64 = 287.053_07;
const GAMMA_AIR: f64 = 1.4;
const G0: f64 = 9.806_65;
const EARTH_RADIUS_M: f64 = 6_356_766.0;
const MAX_ALTITUDE_M: f64 = 47_000.0;

/// Layer base: geopotential altitude (m), temperature (K), pressure (Pa), lapse rate (K/m).
const LAYERS: [(f64, f64, f64, f64); 4] = [
    (0.0, 288.15, 101_325.0, -0.0065),
    (11_000.0, 216.65, 22_632.06, 0.0),
    (20_000.0, 216.65, 5_474.889, 0.001),
    (32_000.0, 228.65, 868.018_7, 0.0028),
];

/// Static freestream properties at one altitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereState {
    /// Static temperature (K)
    pub temperature: f64,
    /// Static pressure (Pa)
    pub pressure: f64,
    /// Density (kg/m³)
    pub density: f64,
    /// Speed of sound (m/s)
    pub speed_of_sound: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    /// Properties at geometric `altitude_m` with a temperature offset `delta_isa_k`.
    pub fn compute(&self, altitude_m: f64, delta_isa_k: f64) -> ComponentResult<AtmosphereState> {
        check_finite(altitude_m, "altitude")?;
        check_finite(delta_isa_k, "ISA temperature offset")?;
        if !(-1_000.0..=MAX_ALTITUDE_M).contains(&altitude_m) {
            return Err(ComponentError::OutOfRange {
                what: "altitude",
                value: altitude_m,
                expected: "in [-1000, 47000] m",
            });
        }

        let h = altitude_m * EARTH_RADIUS_M / (EARTH_RADIUS_M + altitude_m);
        let (h_b, t_b, p_b, lapse) = LAYERS
            .iter()
            .rev()
            .copied()
            .find(|layer| h >= layer.0)
            .unwrap_or(LAYERS[0]);

        let (t_std, pressure) = if lapse == 0.0 {
            (t_b, p_b * (-G0 * (h - h_b) / (R_AIR * t_b)).exp())
        } else {
            let t = t_b + lapse * (h - h_b);
            (t, p_b * (t / t_b).powf(-G0 / (lapse * R_AIR)))
        };

        let temperature = t_std + delta_isa_k;
        if temperature <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "ISA offset drives temperature below 0 K",
            });
        }

        Ok(AtmosphereState {
            temperature,
            pressure,
            density: pressure / (R_AIR * temperature),
            speed_of_sound: (GAMMA_AIR * R_AIR * temperature).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sea_level_standard_day() {
        let s = StandardAtmosphere.compute(0.0, 0.0).unwrap();
        assert!((s.temperature - 288.15).abs() < 1e-9);
        assert!((s.pressure - 101_325.0).abs() < 1e-6);
        assert!((s.density - 1.225).abs() < 1e-3);
    }

    #[test]
    fn ten_kilometres() {
        // geometric 10 km is 9984.3 m geopotential
        let s = StandardAtmosphere.compute(10_000.0, 0.0).unwrap();
        assert!((s.temperature - 223.252).abs() < 0.01);
        assert!((s.pressure - 26_499.9).abs() < 2.0);
    }

    #[test]
    fn tropopause_is_isothermal() {
        let a = StandardAtmosphere.compute(12_000.0, 0.0).unwrap();
        let b = StandardAtmosphere.compute(18_000.0, 0.0).unwrap();
        assert!((a.temperature - 216.65).abs() < 1e-9);
        assert!((b.temperature - 216.65).abs() < 1e-9);
        assert!(b.pressure < a.pressure);
    }

    #[test]
    fn offset_changes_temperature_only() {
        let std = StandardAtmosphere.compute(5_000.0, 0.0).unwrap();
        let hot = StandardAtmosphere.compute(5_000.0, 15.0).unwrap();
        assert!((hot.temperature - std.temperature - 15.0).abs() < 1e-9);
        assert_eq!(hot.pressure, std.pressure);
        assert!(hot.density < std.density);
    }

    #[test]
    fn rejects_altitude_above_model_ceiling() {
        assert!(StandardAtmosphere.compute(60_000.0, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn pressure_decreases_with_altitude(h in 0.0f64..46_000.0, dh in 1.0f64..1_000.0) {
            let lo = StandardAtmosphere.compute(h, 0.0).unwrap();
            let hi = StandardAtmosphere.compute(h + dh, 0.0).unwrap();
            prop_assert!(hi.pressure < lo.pressure);
        }
    }
}
