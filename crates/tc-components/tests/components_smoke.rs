//! Integration tests for tc-components: a full design-point pass through
//! the flow path using only component models.

use tc_components::{
    Combustor, Compressor, CompressorKind, CompressorMap, Duct, FlowComponent, Nozzle,
    PerfectGas, Ram, StandardAtmosphere, Thrust, ThrustInputs, TotalState, Turbine,
};

struct Stations {
    t2: TotalState,
    t21: TotalState,
    t25: TotalState,
    t3: TotalState,
    t4: TotalState,
    t45: TotalState,
    t5: TotalState,
    fuel_fraction: f64,
}

fn cruise_cycle(gas: &PerfectGas) -> (Stations, f64, f64, f64) {
    let atm = StandardAtmosphere.compute(10_000.0, 0.0).unwrap();
    let ram = Ram.compute(gas, atm.temperature, atm.pressure, 0.78).unwrap();

    let inlet = Duct::new("inlet", 0.98).unwrap();
    let fan = Compressor::new("fan", CompressorKind::Fan, 1.58, 0.93, CompressorMap::fan()).unwrap();
    let lpc = Compressor::new("lpc", CompressorKind::Core, 3.0, 0.91, CompressorMap::low_pressure_compressor()).unwrap();
    let hpc = Compressor::new("hpc", CompressorKind::Core, 9.0, 0.91, CompressorMap::high_pressure_compressor()).unwrap();
    let burner = Combustor::new("burner", 0.95, 0.99, 43.0e6).unwrap();
    let hpt = Turbine::new("hpt", 0.93, 0.99).unwrap();
    let lpt = Turbine::new("lpt", 0.93, 0.99).unwrap();
    let alpha = 5.4;

    let t2 = inlet.flow(gas, &ram.total).unwrap();
    let t21 = fan.compute(gas, &t2, fan.pressure_ratio).unwrap();
    let t25 = lpc.compute(gas, &t2, lpc.pressure_ratio).unwrap();
    let t3 = hpc.compute(gas, &t25, hpc.pressure_ratio).unwrap();
    let burn = burner.burn(gas, &t3, 1500.0).unwrap();
    let f = burn.fuel_fraction;

    let dh_ht = hpt.required_enthalpy_drop(t3.enthalpy - t25.enthalpy, f);
    let t45 = hpt.compute(gas, &burn.outlet, dh_ht).unwrap();
    let lp_work = (t25.enthalpy - t2.enthalpy) + alpha * (t21.enthalpy - t2.enthalpy);
    let dh_lt = lpt.required_enthalpy_drop(lp_work, f);
    let t5 = lpt.compute(gas, &t45, dh_lt).unwrap();

    (
        Stations {
            t2,
            t21,
            t25,
            t3,
            t4: burn.outlet,
            t45,
            t5,
            fuel_fraction: f,
        },
        atm.pressure,
        ram.velocity,
        ram.speed_of_sound,
    )
}

#[test]
fn stations_follow_expected_ordering() {
    let gas = PerfectGas::air();
    let (s, _, _, _) = cruise_cycle(&gas);

    assert!(s.t21.pressure > s.t2.pressure);
    assert!(s.t25.pressure > s.t21.pressure);
    assert!(s.t3.pressure > s.t25.pressure);
    assert!(s.t4.pressure < s.t3.pressure);
    assert!(s.t45.temperature < s.t4.temperature);
    assert!(s.t5.temperature < s.t45.temperature);
    assert!(s.t5.pressure > 0.0);
    assert!(s.fuel_fraction > 0.0 && s.fuel_fraction < 0.05);
}

#[test]
fn shaft_power_balances() {
    let gas = PerfectGas::air();
    let (s, _, _, _) = cruise_cycle(&gas);
    let f = s.fuel_fraction;

    let hp_turbine = (1.0 + f) * 0.99 * (s.t4.enthalpy - s.t45.enthalpy);
    let hp_compressor = s.t3.enthalpy - s.t25.enthalpy;
    assert!((hp_turbine - hp_compressor).abs() < 1e-6 * hp_compressor);
}

#[test]
fn design_cycle_produces_positive_thrust() {
    let gas = PerfectGas::air();
    let (s, p0, u0, a0) = cruise_cycle(&gas);

    let core_nozzle = Nozzle::new("core_nozzle", 0.99).unwrap();
    let fan_nozzle = Nozzle::new("fan_nozzle", 0.98).unwrap();
    let core_exit = core_nozzle.expand_to_ambient(&gas, &s.t5, p0).unwrap();
    let fan_exit = fan_nozzle.expand_to_ambient(&gas, &s.t21, p0).unwrap();

    assert!(core_exit.flow_speed > u0, "core jet must be faster than flight");
    assert!(fan_exit.flow_speed > u0, "fan jet must be faster than flight");

    let report = Thrust::default()
        .evaluate(&ThrustInputs {
            core_mass_flow: 20.0,
            bypass_ratio: 5.4,
            fuel_fraction: s.fuel_fraction,
            flight_speed: u0,
            speed_of_sound: a0,
            core_exit_speed: core_exit.flow_speed,
            fan_exit_speed: fan_exit.flow_speed,
        })
        .unwrap();

    assert!(report.thrust > 0.0);
    assert!(report.tsfc > 0.0 && report.tsfc.is_finite());
    assert!(report.specific_impulse > 1_000.0);
}
