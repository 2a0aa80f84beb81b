use std::path::Path;
use tc_engine::{Turbofan, TurbofanConfig, load_yaml, save_yaml};

fn configs_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

#[test]
fn shipped_config_loads_and_sizes() {
    let path = configs_dir().join("representative_turbofan.yaml");
    let config = load_yaml(&path).unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()));
    assert_eq!(config, TurbofanConfig::default());

    let mut engine = Turbofan::new(config).unwrap();
    let report = engine.size().unwrap();
    assert!(report.design.core_mass_flow > 0.0);
}

#[test]
fn save_then_load_roundtrip() {
    let mut config = TurbofanConfig::default();
    config.name = "roundtrip".to_string();
    config.bypass_ratio = 6.0;

    let path = std::env::temp_dir().join(format!("tc_engine_roundtrip_{}.yaml", std::process::id()));
    save_yaml(&path, &config).unwrap();
    let back = load_yaml(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(back, config);
}

#[test]
fn invalid_yaml_value_is_reported_with_field() {
    let yaml = "name: broken\nfan:\n  pressure_ratio: 0.9\n  polytropic_efficiency: 0.9\n  map: { a: 3.0, b: 0.85, k: 0.03, c_eff: 0.1, d_eff: 0.15 }\n";
    let err = tc_engine::config::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("fan.pressure_ratio"), "{err}");
}
