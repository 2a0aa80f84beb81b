//! tc-components: station models for a two-spool separate-flow turbofan.
//!
//! Provides models for each element of the flow path:
//! - Freestream ram capture and the standard atmosphere
//! - Adiabatic ducts and exhaust nozzles
//! - Fan and core compressors with parametric performance maps
//! - Combustor and turbines
//! - Net thrust bookkeeping
//!
//! Every element implements [`FlowComponent`] and is a deterministic function
//! of its inlet total state and one control input, so a single set of
//! component instances serves every flight condition of a batch solve.
//!
//! # Example
//!
//! ```
//! use tc_components::{Compressor, CompressorKind, CompressorMap, FlowComponent, PerfectGas, Ram};
//!
//! let gas = PerfectGas::air();
//! let ram = Ram.compute(&gas, 223.25, 26_436.0, 0.78).unwrap();
//!
//! let fan = Compressor::new("fan", CompressorKind::Fan, 1.58, 0.93, CompressorMap::fan()).unwrap();
//! let out = fan.compute(&gas, &ram.total, 1.58).unwrap();
//! assert!(out.temperature > ram.total.temperature);
//! ```

pub mod atmosphere;
pub mod combustor;
pub mod common;
pub mod compressor;
pub mod duct;
pub mod error;
pub mod gas;
pub mod map;
pub mod nozzle;
pub mod ram;
pub mod thrust;
pub mod traits;
pub mod turbine;

// Re-exports
pub use atmosphere::{AtmosphereState, StandardAtmosphere};
pub use combustor::{Combustor, CombustorOutput};
pub use common::TotalState;
pub use compressor::{Compressor, CompressorKind, FaceSizing};
pub use duct::Duct;
pub use error::{ComponentError, ComponentResult};
pub use gas::PerfectGas;
pub use map::{CompressorMap, MapAnchor, MapPoint};
pub use nozzle::{ExitState, Nozzle};
pub use ram::{Ram, RamOutput};
pub use thrust::{Thrust, ThrustInputs, ThrustReport};
pub use traits::FlowComponent;
pub use turbine::Turbine;
