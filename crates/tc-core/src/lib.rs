//! tc-core: shared vocabulary of the turbocycle workspace.
//!
//! - `units`: uom quantities used at public boundaries, plus the sea-level
//!   reference state that corrected flows and speeds are normalised by
//! - `numeric`: range checks for efficiencies, loss ratios and other scalars
//! - `error`: the error type the checks report

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TcError, TcResult};
pub use numeric::*;
pub use units::*;
