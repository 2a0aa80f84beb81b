//! Design record, per-condition unknowns and their batch packing.

use crate::config::TurbofanConfig;
use crate::error::{EngineError, EngineResult};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tc_components::MapAnchor;

/// Number of tracked unknowns per condition.
pub const BASELINE_LEN: usize = 8;

/// Names of the unknowns in packing order.
pub const BASELINE_NAMES: [&str; BASELINE_LEN] = [
    "fan pressure ratio",
    "LPC pressure ratio",
    "HPC pressure ratio",
    "fan corrected flow",
    "LPC corrected flow",
    "HPC corrected flow",
    "turbine inlet temperature",
    "core nozzle total pressure",
];

/// Everything fixed by the design-point evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    /// Component constants the engine was sized with
    pub config: TurbofanConfig,
    /// Reference temperature for corrected quantities (K)
    pub t_ref: f64,
    /// Reference pressure for corrected quantities (Pa)
    pub p_ref: f64,

    pub fan: MapAnchor,
    pub lpc: MapAnchor,
    pub hpc: MapAnchor,
    /// HPT inlet corrected flow (kg/s)
    pub hpt_corrected_flow: f64,
    /// LPT inlet corrected flow (kg/s)
    pub lpt_corrected_flow: f64,

    /// Fan face annulus area (m²)
    pub fan_face_area: f64,
    pub fan_tip_diameter: f64,
    /// HPC face annulus area (m²)
    pub hpc_face_area: f64,
    /// Fan nozzle exit area A7 (m²)
    pub fan_nozzle_area: f64,
    /// Core nozzle exit area A5 (m²)
    pub core_nozzle_area: f64,

    pub bypass_ratio: f64,
    pub fuel_fraction: f64,
    /// Physical core mass flow per engine (kg/s)
    pub core_mass_flow: f64,
    /// Core nozzle total pressure Pt5 (Pa)
    pub core_nozzle_total_pressure: f64,
    pub turbine_inlet_temperature: f64,
    /// Tt4 / Tt2 at design
    pub temperature_ratio: f64,
    pub gear_factor: f64,

    /// Thrust per engine at the design point (N)
    pub thrust_per_engine: f64,
    pub specific_thrust: f64,
    /// kg/(N·s)
    pub tsfc: f64,
}

impl DesignParameters {
    /// Seed that reproduces the design point exactly.
    pub fn baseline(&self) -> BaselineParameters {
        BaselineParameters {
            fan_pressure_ratio: self.fan.pressure_ratio,
            lpc_pressure_ratio: self.lpc.pressure_ratio,
            hpc_pressure_ratio: self.hpc.pressure_ratio,
            fan_corrected_flow: self.fan.corrected_flow,
            lpc_corrected_flow: self.lpc.corrected_flow,
            hpc_corrected_flow: self.hpc.corrected_flow,
            turbine_inlet_temperature: self.turbine_inlet_temperature,
            core_nozzle_total_pressure: self.core_nozzle_total_pressure,
        }
    }
}

/// The unknowns of one condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineParameters {
    pub fan_pressure_ratio: f64,
    pub lpc_pressure_ratio: f64,
    pub hpc_pressure_ratio: f64,
    pub fan_corrected_flow: f64,
    pub lpc_corrected_flow: f64,
    pub hpc_corrected_flow: f64,
    /// Tt4 (K)
    pub turbine_inlet_temperature: f64,
    /// Pt5 (Pa)
    pub core_nozzle_total_pressure: f64,
}

impl BaselineParameters {
    pub fn to_array(&self) -> [f64; BASELINE_LEN] {
        [
            self.fan_pressure_ratio,
            self.lpc_pressure_ratio,
            self.hpc_pressure_ratio,
            self.fan_corrected_flow,
            self.lpc_corrected_flow,
            self.hpc_corrected_flow,
            self.turbine_inlet_temperature,
            self.core_nozzle_total_pressure,
        ]
    }

    pub fn from_slice(x: &[f64]) -> EngineResult<Self> {
        let &[
            fan_pressure_ratio,
            lpc_pressure_ratio,
            hpc_pressure_ratio,
            fan_corrected_flow,
            lpc_corrected_flow,
            hpc_corrected_flow,
            turbine_inlet_temperature,
            core_nozzle_total_pressure,
        ] = x
        else {
            return Err(EngineError::invalid(
                "baseline",
                x.len(),
                "expected 8 values",
            ));
        };
        Ok(Self {
            fan_pressure_ratio,
            lpc_pressure_ratio,
            hpc_pressure_ratio,
            fan_corrected_flow,
            lpc_corrected_flow,
            hpc_corrected_flow,
            turbine_inlet_temperature,
            core_nozzle_total_pressure,
        })
    }

    /// Unknowns outside their physical range, described for diagnostics.
    pub fn violations(&self) -> Vec<String> {
        let x = self.to_array();
        let mut out = Vec::new();
        for (i, (&v, name)) in x.iter().zip(BASELINE_NAMES).enumerate() {
            let ok = if i < 3 { v > 1.0 } else { v > 0.0 };
            if !ok {
                let bound = if i < 3 { "1" } else { "0" };
                out.push(format!("{name} = {v} must exceed {bound}"));
            }
        }
        out
    }
}

/// Solve context plus one set of unknowns per condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffdesignParameters {
    pub design: DesignParameters,
    pub baselines: Vec<BaselineParameters>,
}

impl OffdesignParameters {
    /// Every condition seeded from the design point.
    pub fn from_design(design: &DesignParameters, conditions: usize) -> Self {
        Self {
            baselines: vec![design.baseline(); conditions],
            design: design.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Pack into an `(8, N)` matrix, one column per condition.
    pub fn pack(&self) -> DMatrix<f64> {
        let mut x = DMatrix::zeros(BASELINE_LEN, self.baselines.len());
        for (c, b) in self.baselines.iter().enumerate() {
            for (r, v) in b.to_array().into_iter().enumerate() {
                x[(r, c)] = v;
            }
        }
        x
    }

    /// Inverse of [`pack`](Self::pack).
    pub fn unpack(design: DesignParameters, x: &DMatrix<f64>) -> EngineResult<Self> {
        if x.nrows() != BASELINE_LEN {
            return Err(EngineError::invalid(
                "baseline matrix rows",
                x.nrows(),
                "expected 8",
            ));
        }
        let baselines = x
            .column_iter()
            .map(|col| BaselineParameters::from_slice(&col.iter().copied().collect::<Vec<_>>()))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { design, baselines })
    }
}
