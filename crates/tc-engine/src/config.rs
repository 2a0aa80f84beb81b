//! Engine configuration file format and validation.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tc_components::{CompressorMap, PerfectGas};

/// Complete description of a two-spool separate-flow turbofan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TurbofanConfig {
    pub name: String,
    pub number_of_engines: usize,
    pub design: DesignPointDef,
    pub gas: PerfectGas,
    /// Design bypass ratio `mdot_fan / mdot_core`
    pub bypass_ratio: f64,
    /// Inlet diffuser total-pressure recovery
    pub inlet_pressure_ratio: f64,
    pub fan: CompressorDef,
    pub lpc: CompressorDef,
    pub hpc: CompressorDef,
    pub combustor: CombustorDef,
    pub hpt: TurbineDef,
    pub lpt: TurbineDef,
    /// Bypass duct plus fan nozzle total-pressure ratio
    pub fan_nozzle_pressure_ratio: f64,
    /// Core nozzle total-pressure ratio
    pub core_nozzle_pressure_ratio: f64,
    /// Low-spool to fan speed ratio (1.0 for a direct drive)
    pub gear_factor: f64,
    /// Axial Mach number at the fan and HPC faces used for sizing
    pub face_mach: f64,
}

/// Flight condition and thrust requirement the engine is sized for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DesignPointDef {
    pub mach: f64,
    pub altitude_m: f64,
    pub delta_isa_k: f64,
    /// Required thrust of all engines together (N)
    pub total_thrust_n: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressorDef {
    pub pressure_ratio: f64,
    pub polytropic_efficiency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_to_tip_ratio: Option<f64>,
    pub map: CompressorMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombustorDef {
    pub pressure_ratio: f64,
    pub efficiency: f64,
    /// Fuel lower heating value (J/kg)
    pub fuel_specific_energy: f64,
    /// Design turbine inlet total temperature (K)
    pub turbine_inlet_temperature_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurbineDef {
    pub polytropic_efficiency: f64,
    pub mechanical_efficiency: f64,
}

impl Default for DesignPointDef {
    fn default() -> Self {
        Self {
            mach: 0.78,
            altitude_m: 10_000.0,
            delta_isa_k: 0.0,
            total_thrust_n: 50_000.0,
        }
    }
}

impl Default for TurbofanConfig {
    /// Representative high-bypass airliner turbofan.
    fn default() -> Self {
        Self {
            name: "representative_turbofan".to_string(),
            number_of_engines: 2,
            design: DesignPointDef::default(),
            gas: PerfectGas::air(),
            bypass_ratio: 7.0,
            inlet_pressure_ratio: 0.98,
            fan: CompressorDef {
                pressure_ratio: 1.7,
                polytropic_efficiency: 0.93,
                hub_to_tip_ratio: Some(0.325),
                map: CompressorMap::fan(),
            },
            lpc: CompressorDef {
                pressure_ratio: 3.0,
                polytropic_efficiency: 0.91,
                hub_to_tip_ratio: None,
                map: CompressorMap::low_pressure_compressor(),
            },
            hpc: CompressorDef {
                pressure_ratio: 9.0,
                polytropic_efficiency: 0.91,
                hub_to_tip_ratio: Some(0.325),
                map: CompressorMap::high_pressure_compressor(),
            },
            combustor: CombustorDef {
                pressure_ratio: 0.95,
                efficiency: 0.99,
                fuel_specific_energy: 43.0e6,
                turbine_inlet_temperature_k: 1400.0,
            },
            hpt: TurbineDef {
                polytropic_efficiency: 0.93,
                mechanical_efficiency: 0.99,
            },
            lpt: TurbineDef {
                polytropic_efficiency: 0.93,
                mechanical_efficiency: 0.99,
            },
            fan_nozzle_pressure_ratio: 0.98,
            core_nozzle_pressure_ratio: 0.99,
            gear_factor: 1.0,
            face_mach: 0.6,
        }
    }
}

impl TurbofanConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid("name", "\"\"", "must not be empty"));
        }
        if self.number_of_engines == 0 {
            return Err(EngineError::invalid(
                "number_of_engines",
                0,
                "at least one engine is required",
            ));
        }

        let d = &self.design;
        check_range("design.mach", d.mach, 0.0, 0.95)?;
        check_range("design.altitude_m", d.altitude_m, -1_000.0, 20_000.0)?;
        check_range("design.delta_isa_k", d.delta_isa_k, -60.0, 60.0)?;
        check_positive("design.total_thrust_n", d.total_thrust_n)?;

        if !(self.gas.gamma > 1.0) || !(self.gas.gas_constant > 0.0) {
            return Err(EngineError::invalid(
                "gas",
                format!("gamma={}, R={}", self.gas.gamma, self.gas.gas_constant),
                "need gamma > 1 and R > 0",
            ));
        }
        check_positive("bypass_ratio", self.bypass_ratio)?;
        check_fraction("inlet_pressure_ratio", self.inlet_pressure_ratio)?;

        for (field, c) in [("fan", &self.fan), ("lpc", &self.lpc), ("hpc", &self.hpc)] {
            if !(c.pressure_ratio > 1.0) {
                return Err(EngineError::invalid(
                    &format!("{field}.pressure_ratio"),
                    c.pressure_ratio,
                    "must exceed 1",
                ));
            }
            check_fraction(&format!("{field}.polytropic_efficiency"), c.polytropic_efficiency)?;
            if let Some(htr) = c.hub_to_tip_ratio {
                check_range(&format!("{field}.hub_to_tip_ratio"), htr, 0.0, 0.95)?;
            }
            c.map
                .validate()
                .map_err(|e| EngineError::invalid(&format!("{field}.map"), "-", &e.to_string()))?;
        }

        let b = &self.combustor;
        check_fraction("combustor.pressure_ratio", b.pressure_ratio)?;
        check_fraction("combustor.efficiency", b.efficiency)?;
        check_positive("combustor.fuel_specific_energy", b.fuel_specific_energy)?;
        check_range(
            "combustor.turbine_inlet_temperature_k",
            b.turbine_inlet_temperature_k,
            600.0,
            2_500.0,
        )?;

        for (field, t) in [("hpt", &self.hpt), ("lpt", &self.lpt)] {
            check_fraction(&format!("{field}.polytropic_efficiency"), t.polytropic_efficiency)?;
            check_fraction(&format!("{field}.mechanical_efficiency"), t.mechanical_efficiency)?;
        }

        check_fraction("fan_nozzle_pressure_ratio", self.fan_nozzle_pressure_ratio)?;
        check_fraction("core_nozzle_pressure_ratio", self.core_nozzle_pressure_ratio)?;
        check_positive("gear_factor", self.gear_factor)?;
        check_range("face_mach", self.face_mach, 0.05, 0.95)?;
        Ok(())
    }
}

fn check_positive(field: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(field, value, "must be finite and positive"))
    }
}

fn check_fraction(field: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(field, value, "must be in (0, 1]"))
    }
}

fn check_range(field: &str, value: f64, lo: f64, hi: f64) -> EngineResult<()> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid(
            field,
            value,
            &format!("must be in [{lo}, {hi}]"),
        ))
    }
}

pub fn load_yaml(path: &Path) -> EngineResult<TurbofanConfig> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn from_yaml_str(content: &str) -> EngineResult<TurbofanConfig> {
    let config: TurbofanConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &TurbofanConfig) -> EngineResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
