//! Cycle evaluator: chains the component models in flow order.
//!
//! Station numbering:
//!
//! ```text
//! 0   freestream          2   fan/LPC face        21  fan exit
//! 25  HPC face            3   HPC exit            4   combustor exit
//! 45  HPT exit            49  LPT exit            5   core nozzle
//! 6   core exhaust        7   fan nozzle          8   fan exhaust
//! ```
//!
//! Design mode fixes areas and reference flows; off-design mode evaluates the
//! eight matching residuals for a given set of unknowns.

use crate::condition::FlightCondition;
use crate::config::TurbofanConfig;
use crate::error::{EngineError, EngineResult};
use crate::params::{BASELINE_LEN, BaselineParameters, DesignParameters};
use tc_components::{
    Combustor, ComponentError, ComponentResult, Compressor, CompressorKind, Duct, ExitState,
    FlowComponent, MapAnchor, Nozzle, PerfectGas, Ram, Thrust, ThrustInputs, ThrustReport,
    TotalState, Turbine,
};
use tc_core::units::constants::{P_REF_PA, T_REF_K};
use tracing::info;

/// Component instances built once from a configuration.
#[derive(Debug, Clone)]
pub struct EngineComponents {
    pub gas: PerfectGas,
    pub inlet: Duct,
    pub fan: Compressor,
    pub lpc: Compressor,
    pub hpc: Compressor,
    pub combustor: Combustor,
    pub hpt: Turbine,
    pub lpt: Turbine,
    pub fan_nozzle: Nozzle,
    pub core_nozzle: Nozzle,
    pub thrust: Thrust,
}

impl EngineComponents {
    pub fn from_config(config: &TurbofanConfig) -> EngineResult<Self> {
        Ok(Self {
            gas: PerfectGas::new(config.gas.gamma, config.gas.gas_constant)?,
            inlet: Duct::new("inlet", config.inlet_pressure_ratio)?,
            fan: Compressor::new(
                "fan",
                CompressorKind::Fan,
                config.fan.pressure_ratio,
                config.fan.polytropic_efficiency,
                config.fan.map,
            )?,
            lpc: Compressor::new(
                "lpc",
                CompressorKind::Core,
                config.lpc.pressure_ratio,
                config.lpc.polytropic_efficiency,
                config.lpc.map,
            )?,
            hpc: Compressor::new(
                "hpc",
                CompressorKind::Core,
                config.hpc.pressure_ratio,
                config.hpc.polytropic_efficiency,
                config.hpc.map,
            )?,
            combustor: Combustor::new(
                "combustor",
                config.combustor.pressure_ratio,
                config.combustor.efficiency,
                config.combustor.fuel_specific_energy,
            )?,
            hpt: Turbine::new(
                "hpt",
                config.hpt.polytropic_efficiency,
                config.hpt.mechanical_efficiency,
            )?,
            lpt: Turbine::new(
                "lpt",
                config.lpt.polytropic_efficiency,
                config.lpt.mechanical_efficiency,
            )?,
            fan_nozzle: Nozzle::new("fan_nozzle", config.fan_nozzle_pressure_ratio)?,
            core_nozzle: Nozzle::new("core_nozzle", config.core_nozzle_pressure_ratio)?,
            thrust: Thrust::default(),
        })
    }
}

/// Corrected mass flow `mdot·sqrt(Tt/Tref)/(Pt/Pref)`.
pub fn corrected_flow(mass_flow: f64, state: &TotalState) -> f64 {
    mass_flow * (state.temperature / T_REF_K).sqrt() / (state.pressure / P_REF_PA)
}

/// Physical mass flow from a corrected flow at `state`.
pub fn physical_flow(corrected: f64, state: &TotalState) -> f64 {
    corrected * (state.pressure / P_REF_PA) / (state.temperature / T_REF_K).sqrt()
}

/// Station states and flows common to both modes.
#[derive(Debug, Clone, Copy)]
pub struct Stations {
    pub t2: TotalState,
    pub t21: TotalState,
    pub t25: TotalState,
    pub t3: TotalState,
    pub t4: TotalState,
    pub t45: TotalState,
    pub t49: TotalState,
    pub fan_exit: ExitState,
    pub core_exit: ExitState,
    pub fuel_fraction: f64,
    pub flight_speed: f64,
    pub speed_of_sound: f64,
}

fn freestream(
    parts: &EngineComponents,
    condition: &FlightCondition,
) -> ComponentResult<(TotalState, f64, f64)> {
    let ram = Ram.compute(
        &parts.gas,
        condition.temperature_k(),
        condition.pressure_pa(),
        condition.mach,
    )?;
    let t2 = parts.inlet.flow(&parts.gas, &ram.total)?;
    Ok((t2, ram.velocity, ram.speed_of_sound))
}

/// Low-spool work per unit core flow: LPC plus fan on the bypass stream.
fn low_spool_work(t2: &TotalState, t21: &TotalState, t25: &TotalState, bypass_ratio: f64) -> f64 {
    (t25.enthalpy - t2.enthalpy) + bypass_ratio * (t21.enthalpy - t2.enthalpy)
}

/// Run the cycle at the configured design pressure ratios and size the engine
/// for `thrust_per_engine`.
pub fn design_point(
    parts: &EngineComponents,
    config: &TurbofanConfig,
    condition: &FlightCondition,
    thrust_per_engine: f64,
) -> EngineResult<DesignParameters> {
    let gas = &parts.gas;
    let alpha = config.bypass_ratio;
    let p0 = condition.pressure_pa();

    let (t2, u0, a0) = freestream(parts, condition)?;
    let t21 = parts.fan.compute(gas, &t2, config.fan.pressure_ratio)?;
    let t25 = parts.lpc.compute(gas, &t2, config.lpc.pressure_ratio)?;
    let t3 = parts.hpc.compute(gas, &t25, config.hpc.pressure_ratio)?;
    let burn = parts
        .combustor
        .burn(gas, &t3, config.combustor.turbine_inlet_temperature_k)?;
    let f = burn.fuel_fraction;
    let t4 = burn.outlet;

    let dh_ht = parts.hpt.required_enthalpy_drop(t3.enthalpy - t25.enthalpy, f);
    let t45 = parts.hpt.expand_by_enthalpy(gas, &t4, dh_ht)?;
    let dh_lt = parts
        .lpt
        .required_enthalpy_drop(low_spool_work(&t2, &t21, &t25, alpha), f);
    let t49 = parts.lpt.expand_by_enthalpy(gas, &t45, dh_lt)?;

    let fan_exit = parts.fan_nozzle.expand_to_ambient(gas, &t21, p0)?;
    let core_exit = parts.core_nozzle.expand_to_ambient(gas, &t49, p0)?;

    let specific = parts.thrust.evaluate(&ThrustInputs {
        core_mass_flow: 1.0,
        bypass_ratio: alpha,
        fuel_fraction: f,
        flight_speed: u0,
        speed_of_sound: a0,
        core_exit_speed: core_exit.flow_speed,
        fan_exit_speed: fan_exit.flow_speed,
    })?;
    if !(specific.thrust > 0.0) {
        return Err(EngineError::NonPhysicalDesign {
            what: format!(
                "cycle produces {:.3} N per kg/s of core flow",
                specific.thrust
            ),
        });
    }
    let core_mass_flow = thrust_per_engine / specific.thrust;
    let fan_mass_flow = alpha * core_mass_flow;

    let fan_face = parts.fan.size(
        gas,
        &t2,
        core_mass_flow,
        config.face_mach,
        alpha,
        config.fan.hub_to_tip_ratio.unwrap_or(0.0),
    )?;
    let hpc_face = parts.hpc.size(
        gas,
        &t25,
        core_mass_flow,
        config.face_mach,
        alpha,
        config.hpc.hub_to_tip_ratio.unwrap_or(0.0),
    )?;
    let fan_nozzle_area = parts.fan_nozzle.exit_area(fan_mass_flow, &fan_exit)?;
    let core_nozzle_area = parts
        .core_nozzle
        .exit_area((1.0 + f) * core_mass_flow, &core_exit)?;

    let low_speed = 1.0 / (t2.temperature / T_REF_K).sqrt();
    let high_speed = 1.0 / (t25.temperature / T_REF_K).sqrt();
    let gear = config.gear_factor;

    let design = DesignParameters {
        config: config.clone(),
        t_ref: T_REF_K,
        p_ref: P_REF_PA,
        fan: MapAnchor {
            pressure_ratio: config.fan.pressure_ratio,
            corrected_flow: corrected_flow(fan_mass_flow, &t2),
            corrected_speed: low_speed / gear,
            polytropic_efficiency: config.fan.polytropic_efficiency,
        },
        lpc: MapAnchor {
            pressure_ratio: config.lpc.pressure_ratio,
            corrected_flow: corrected_flow(core_mass_flow, &t2),
            corrected_speed: low_speed,
            polytropic_efficiency: config.lpc.polytropic_efficiency,
        },
        hpc: MapAnchor {
            pressure_ratio: config.hpc.pressure_ratio,
            corrected_flow: corrected_flow(core_mass_flow, &t25),
            corrected_speed: high_speed,
            polytropic_efficiency: config.hpc.polytropic_efficiency,
        },
        hpt_corrected_flow: corrected_flow((1.0 + f) * core_mass_flow, &t4),
        lpt_corrected_flow: corrected_flow((1.0 + f) * core_mass_flow, &t45),
        fan_face_area: fan_face.area,
        fan_tip_diameter: fan_face.tip_diameter,
        hpc_face_area: hpc_face.area,
        fan_nozzle_area,
        core_nozzle_area,
        bypass_ratio: alpha,
        fuel_fraction: f,
        core_mass_flow,
        core_nozzle_total_pressure: t49.pressure * parts.core_nozzle.pressure_ratio(),
        turbine_inlet_temperature: t4.temperature,
        temperature_ratio: t4.temperature / t2.temperature,
        gear_factor: gear,
        thrust_per_engine,
        specific_thrust: specific.specific_thrust,
        tsfc: specific.tsfc,
    };

    info!(
        core_mass_flow = design.core_mass_flow,
        fan_diameter_m = design.fan_tip_diameter,
        fuel_fraction = f,
        tsfc = design.tsfc,
        "engine sized"
    );
    Ok(design)
}

/// Result of one off-design cycle evaluation.
#[derive(Debug, Clone, Copy)]
pub struct OffdesignEvaluation {
    pub residual: [f64; BASELINE_LEN],
    pub stations: Stations,
    pub performance: ThrustReport,
    pub core_mass_flow: f64,
    pub bypass_ratio: f64,
    /// Physical spool speeds as fractions of design
    pub low_spool_speed: f64,
    pub fan_speed: f64,
    pub high_spool_speed: f64,
}

/// Evaluate the matching residual at `x` for one flight condition.
///
/// Performance is per engine.
pub fn offdesign(
    parts: &EngineComponents,
    design: &DesignParameters,
    condition: &FlightCondition,
    x: &BaselineParameters,
) -> ComponentResult<OffdesignEvaluation> {
    let gas = &parts.gas;
    let p0 = condition.pressure_pa();
    let pi_tn = parts.core_nozzle.pressure_ratio();

    let (t2, u0, a0) = freestream(parts, condition)?;

    let fan_pt = parts
        .fan
        .performance(&design.fan, x.fan_pressure_ratio, x.fan_corrected_flow)?;
    let lpc_pt = parts
        .lpc
        .performance(&design.lpc, x.lpc_pressure_ratio, x.lpc_corrected_flow)?;
    let hpc_pt = parts
        .hpc
        .performance(&design.hpc, x.hpc_pressure_ratio, x.hpc_corrected_flow)?;

    let t21 = parts
        .fan
        .compress(gas, &t2, x.fan_pressure_ratio, fan_pt.polytropic_efficiency)?;
    let t25 = parts
        .lpc
        .compress(gas, &t2, x.lpc_pressure_ratio, lpc_pt.polytropic_efficiency)?;
    let t3 = parts
        .hpc
        .compress(gas, &t25, x.hpc_pressure_ratio, hpc_pt.polytropic_efficiency)?;

    let alpha = x.fan_corrected_flow / x.lpc_corrected_flow;
    let core_mass_flow = physical_flow(x.hpc_corrected_flow, &t25);
    let lpc_mass_flow = physical_flow(x.lpc_corrected_flow, &t2);
    let fan_mass_flow = alpha * core_mass_flow;

    let burn = parts.combustor.burn(gas, &t3, x.turbine_inlet_temperature)?;
    let f = burn.fuel_fraction;
    let t4 = burn.outlet;

    let dh_ht = parts.hpt.required_enthalpy_drop(t3.enthalpy - t25.enthalpy, f);
    let t45 = parts.hpt.expand_by_enthalpy(gas, &t4, dh_ht)?;

    // Work-based LPT exit feeds the pressure-consistency row only.
    let dh_lt = parts
        .lpt
        .required_enthalpy_drop(low_spool_work(&t2, &t21, &t25, alpha), f);
    let t49_work = parts.lpt.expand_by_enthalpy(gas, &t45, dh_lt)?;

    if !(x.core_nozzle_total_pressure > 0.0) {
        return Err(ComponentError::NonPhysical {
            what: "core nozzle total pressure must be positive",
        });
    }
    let pi_lt = x.core_nozzle_total_pressure / (pi_tn * t45.pressure);
    let t49 = parts.lpt.expand_by_pressure_ratio(gas, &t45, pi_lt)?;

    let fan_exit = parts.fan_nozzle.expand_to_ambient(gas, &t21, p0)?;
    let core_exit = parts.core_nozzle.expand_to_ambient(gas, &t49, p0)?;

    let theta2 = (t2.temperature / T_REF_K).sqrt();
    let theta25 = (t25.temperature / T_REF_K).sqrt();
    let low_spool_speed = theta2 * lpc_pt.corrected_speed;
    let fan_speed = theta2 * fan_pt.corrected_speed;
    let high_spool_speed = theta25 * hpc_pt.corrected_speed;

    let turbine_flow = (1.0 + f) * core_mass_flow;
    let pt5 = x.core_nozzle_total_pressure;
    let residual = [
        fan_speed * design.gear_factor - low_spool_speed,
        corrected_flow(turbine_flow, &t4) / design.hpt_corrected_flow - 1.0,
        corrected_flow(turbine_flow, &t45) / design.lpt_corrected_flow - 1.0,
        1.0 - fan_exit.mass_flux() * design.fan_nozzle_area / fan_mass_flow,
        1.0 - core_exit.mass_flux() * design.core_nozzle_area / turbine_flow,
        (lpc_mass_flow - core_mass_flow) / core_mass_flow,
        low_spool_speed - condition.throttle,
        (pt5 - pi_tn * t49_work.pressure) / pt5,
    ];

    let performance = parts.thrust.evaluate(&ThrustInputs {
        core_mass_flow,
        bypass_ratio: alpha,
        fuel_fraction: f,
        flight_speed: u0,
        speed_of_sound: a0,
        core_exit_speed: core_exit.flow_speed,
        fan_exit_speed: fan_exit.flow_speed,
    })?;

    Ok(OffdesignEvaluation {
        residual,
        stations: Stations {
            t2,
            t21,
            t25,
            t3,
            t4,
            t45,
            t49,
            fan_exit,
            core_exit,
            fuel_fraction: f,
            flight_speed: u0,
            speed_of_sound: a0,
        },
        performance,
        core_mass_flow,
        bypass_ratio: alpha,
        low_spool_speed,
        fan_speed,
        high_spool_speed,
    })
}
