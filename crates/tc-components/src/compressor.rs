//! Fan and axial compressor model.

use crate::common::{TotalState, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::gas::PerfectGas;
use crate::map::{CompressorMap, MapAnchor, MapPoint};
use crate::traits::FlowComponent;
use std::f64::consts::PI;
use tc_core::numeric::ensure_unit_fraction;

/// Which stream passes through the compressor face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressorKind {
    /// Fan: the face swallows core and bypass flow
    Fan,
    /// Core compressor: core flow only
    Core,
}

/// Polytropic compressor with a parametric performance map.
///
/// ## Model
///
/// ```text
/// Pt_out = pi · Pt_in
/// Tt_out = Tt_in · pi^((γ-1)/(γ·eta_pol))
/// ```
///
/// At design the efficiency is the configured polytropic efficiency; off
/// design it is read from [`CompressorMap`] together with the corrected speed.
#[derive(Clone, Debug)]
pub struct Compressor {
    pub name: String,
    pub kind: CompressorKind,
    /// Design total pressure ratio (> 1)
    pub pressure_ratio: f64,
    /// Design polytropic efficiency (0 < eta <= 1)
    pub polytropic_efficiency: f64,
    pub map: CompressorMap,
}

/// Face geometry fixed at design.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSizing {
    /// Annulus area (m²)
    pub area: f64,
    /// Tip diameter (m)
    pub tip_diameter: f64,
}

impl Compressor {
    pub fn new(
        name: impl Into<String>,
        kind: CompressorKind,
        pressure_ratio: f64,
        polytropic_efficiency: f64,
        map: CompressorMap,
    ) -> ComponentResult<Self> {
        if !(pressure_ratio > 1.0) {
            return Err(ComponentError::InvalidArg {
                what: "compressor pressure ratio must exceed 1",
            });
        }
        ensure_unit_fraction(polytropic_efficiency, "compressor polytropic efficiency")?;
        map.validate()?;
        Ok(Self {
            name: name.into(),
            kind,
            pressure_ratio,
            polytropic_efficiency,
            map,
        })
    }

    /// Compress at an explicit pressure ratio and efficiency.
    pub fn compress(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        pressure_ratio: f64,
        polytropic_efficiency: f64,
    ) -> ComponentResult<TotalState> {
        inlet.check("compressor inlet")?;
        check_finite(pressure_ratio, "compressor pressure ratio")?;
        if pressure_ratio <= 0.0 || polytropic_efficiency <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "compressor pressure ratio and efficiency must be positive",
            });
        }
        let exponent = gas.isentropic_exponent() / polytropic_efficiency;
        let tt = inlet.temperature * pressure_ratio.powf(exponent);
        Ok(TotalState::from_tp(gas, tt, inlet.pressure * pressure_ratio))
    }

    /// Map lookup at an off-design operating point.
    pub fn performance(
        &self,
        anchor: &MapAnchor,
        pressure_ratio: f64,
        corrected_flow: f64,
    ) -> ComponentResult<MapPoint> {
        self.map.evaluate(anchor, pressure_ratio, corrected_flow)
    }

    /// Size the compressor face for the design mass flow at face Mach `mach`.
    ///
    /// The fan face carries `(1 + bypass_ratio)·core_mass_flow`; core
    /// compressors carry the core flow only.
    pub fn size(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        core_mass_flow: f64,
        mach: f64,
        bypass_ratio: f64,
        hub_to_tip_ratio: f64,
    ) -> ComponentResult<FaceSizing> {
        inlet.check("compressor face")?;
        if !(core_mass_flow > 0.0) || !(mach > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "sizing needs positive mass flow and face Mach number",
            });
        }
        if !(0.0..1.0).contains(&hub_to_tip_ratio) {
            return Err(ComponentError::InvalidArg {
                what: "hub-to-tip ratio must be in [0,1)",
            });
        }

        let mass_flow = match self.kind {
            CompressorKind::Fan => (1.0 + bypass_ratio) * core_mass_flow,
            CompressorKind::Core => core_mass_flow,
        };

        let ratio = gas.stagnation_ratio(mach);
        let t = inlet.temperature / ratio;
        let p = inlet.pressure * ratio.powf(-1.0 / gas.isentropic_exponent());
        let rho = gas.density(p, t);
        let u = mach * gas.speed_of_sound(t);

        let area = mass_flow / (rho * u);
        let tip_diameter = (4.0 * area / (PI * (1.0 - hub_to_tip_ratio * hub_to_tip_ratio))).sqrt();
        check_finite(area, "compressor face area")?;

        Ok(FaceSizing { area, tip_diameter })
    }
}

impl FlowComponent for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(
        &self,
        gas: &PerfectGas,
        inlet: &TotalState,
        control: f64,
    ) -> ComponentResult<TotalState> {
        self.compress(gas, inlet, control, self.polytropic_efficiency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fan() -> Compressor {
        Compressor::new("fan", CompressorKind::Fan, 1.6, 0.92, CompressorMap::fan()).unwrap()
    }

    #[test]
    fn rejects_pressure_ratio_below_one() {
        let c = Compressor::new("bad", CompressorKind::Core, 0.9, 0.9, CompressorMap::fan());
        assert!(c.is_err());
    }

    #[test]
    fn work_matches_polytropic_relation() {
        let gas = PerfectGas::air();
        let inlet = TotalState::from_tp(&gas, 250.0, 40_000.0);
        let out = fan().compute(&gas, &inlet, 1.6).unwrap();
        let expected = 250.0 * 1.6f64.powf(gas.isentropic_exponent() / 0.92);
        assert!((out.temperature - expected).abs() < 1e-9);
        assert!((out.pressure - 64_000.0).abs() < 1e-9);
        assert!((out.enthalpy - gas.enthalpy(expected)).abs() < 1e-6);
    }

    #[test]
    fn fan_face_carries_bypass_flow() {
        let gas = PerfectGas::air();
        let inlet = TotalState::from_tp(&gas, 250.0, 40_000.0);
        let core = Compressor::new("hpc", CompressorKind::Core, 9.0, 0.9, CompressorMap::high_pressure_compressor()).unwrap();
        let fan_face = fan().size(&gas, &inlet, 20.0, 0.6, 5.0, 0.3).unwrap();
        let core_face = core.size(&gas, &inlet, 20.0, 0.6, 5.0, 0.3).unwrap();
        assert!((fan_face.area / core_face.area - 6.0).abs() < 1e-9);
        assert!(fan_face.tip_diameter > core_face.tip_diameter);
    }

    proptest! {
        #[test]
        fn less_efficient_means_hotter(pi in 1.05f64..12.0, eta in 0.7f64..0.95) {
            let gas = PerfectGas::air();
            let inlet = TotalState::from_tp(&gas, 288.15, 101_325.0);
            let c = fan();
            let good = c.compress(&gas, &inlet, pi, eta + 0.04).unwrap();
            let bad = c.compress(&gas, &inlet, pi, eta).unwrap();
            prop_assert!(bad.temperature > good.temperature);
            prop_assert!(good.temperature > inlet.temperature);
        }
    }
}
