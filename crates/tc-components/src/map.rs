//! Parametric compressor performance map.
//!
//! ## Model
//!
//! With normalized pressure rise and corrected flow
//!
//! ```text
//! p = (pi - 1) / (pi_D - 1)
//! m = mdot_c / mdot_c,D
//! ```
//!
//! the normalized speed `N` satisfies the speed-line relation
//!
//! ```text
//! p = N^(a·b) + 2·k·N·(N^b - m)
//! ```
//!
//! whose "spine" (`m = N^b`, `p = m^a`) passes through the design point at
//! `N = 1`. Polytropic efficiency falls off quadratically away from the spine
//! and from the design flow:
//!
//! ```text
//! eta = eta_D · (1 - C·(p - m^a)^2 - D·(m - 1)^2)
//! ```

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

const MAX_SPEED_ITERS: usize = 60;
const MAX_BRACKET_DOUBLINGS: usize = 40;

/// Shape coefficients of one map.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressorMap {
    /// Spine pressure exponent
    pub a: f64,
    /// Spine flow exponent
    pub b: f64,
    /// Speed-line slope
    pub k: f64,
    /// Efficiency penalty for leaving the spine
    pub c_eff: f64,
    /// Efficiency penalty for leaving the design flow
    pub d_eff: f64,
}

/// Design-point anchor the map is scaled to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapAnchor {
    pub pressure_ratio: f64,
    /// Corrected mass flow at design (kg/s)
    pub corrected_flow: f64,
    /// Corrected speed at design (dimensionless, physical design speed = 1)
    pub corrected_speed: f64,
    pub polytropic_efficiency: f64,
}

/// Map output at one operating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
    /// Speed relative to design corrected speed
    pub normalized_speed: f64,
    /// Corrected speed, `normalized_speed · anchor.corrected_speed`
    pub corrected_speed: f64,
    pub polytropic_efficiency: f64,
}

impl CompressorMap {
    pub fn fan() -> Self {
        Self {
            a: 2.0,
            b: 0.85,
            k: 0.03,
            c_eff: 0.1,
            d_eff: 0.15,
        }
    }

    pub fn low_pressure_compressor() -> Self {
        Self {
            a: 2.0,
            b: 1.0,
            k: 0.03,
            c_eff: 0.1,
            d_eff: 0.15,
        }
    }

    pub fn high_pressure_compressor() -> Self {
        Self {
            a: 1.5,
            b: 5.0,
            k: 0.03,
            c_eff: 0.1,
            d_eff: 0.15,
        }
    }

    pub fn validate(&self) -> ComponentResult<()> {
        for (v, what) in [
            (self.a, "map exponent a"),
            (self.b, "map exponent b"),
            (self.k, "map slope k"),
            (self.c_eff, "map efficiency coefficient C"),
            (self.d_eff, "map efficiency coefficient D"),
        ] {
            check_finite(v, what)?;
        }
        if self.a <= 0.0 || self.b <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "map exponents must be positive",
            });
        }
        if self.k < 0.0 || self.c_eff < 0.0 || self.d_eff < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "map slope and efficiency coefficients cannot be negative",
            });
        }
        Ok(())
    }

    /// Evaluate speed and efficiency at `(pressure_ratio, corrected_flow)`.
    pub fn evaluate(
        &self,
        anchor: &MapAnchor,
        pressure_ratio: f64,
        corrected_flow: f64,
    ) -> ComponentResult<MapPoint> {
        check_finite(pressure_ratio, "map pressure ratio")?;
        check_finite(corrected_flow, "map corrected flow")?;
        if anchor.pressure_ratio <= 1.0 || anchor.corrected_flow <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "map anchor needs pressure ratio > 1 and positive flow",
            });
        }

        let p = (pressure_ratio - 1.0) / (anchor.pressure_ratio - 1.0);
        let m = corrected_flow / anchor.corrected_flow;
        if p <= 0.0 || m <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "compressor operating point needs pressure ratio > 1 and positive flow",
            });
        }

        let n = self.normalized_speed(p, m)?;
        let spine_offset = p - m.powf(self.a);
        let flow_offset = m - 1.0;
        let falloff = 1.0 - self.c_eff * spine_offset * spine_offset - self.d_eff * flow_offset * flow_offset;
        let eta = anchor.polytropic_efficiency * falloff.max(0.5);

        Ok(MapPoint {
            normalized_speed: n,
            corrected_speed: n * anchor.corrected_speed,
            polytropic_efficiency: eta,
        })
    }

    fn speed_line(&self, n: f64, m: f64, p: f64) -> (f64, f64) {
        let ab = self.a * self.b;
        let nb = n.powf(self.b);
        let f = n.powf(ab) + 2.0 * self.k * n * (nb - m) - p;
        let df = ab * n.powf(ab - 1.0) + 2.0 * self.k * ((self.b + 1.0) * nb - m);
        (f, df)
    }

    /// Bracketed Newton solve of the speed-line relation for `N > 0`.
    fn normalized_speed(&self, p: f64, m: f64) -> ComponentResult<f64> {
        // f(0) = -p < 0, so only an upper bracket is needed.
        let mut lo = 0.0;
        let mut hi = p.powf(1.0 / (self.a * self.b)).max(1.0);
        let mut doublings = 0;
        while self.speed_line(hi, m, p).0 <= 0.0 {
            lo = hi;
            hi *= 2.0;
            doublings += 1;
            if doublings > MAX_BRACKET_DOUBLINGS {
                return Err(ComponentError::ConvergenceFailed {
                    what: "compressor speed line could not be bracketed",
                });
            }
        }

        let mut n = p.powf(1.0 / (self.a * self.b)).clamp(lo, hi);
        for _ in 0..MAX_SPEED_ITERS {
            let (f, df) = self.speed_line(n, m, p);
            if f == 0.0 {
                return Ok(n);
            }
            if f < 0.0 {
                lo = n;
            } else {
                hi = n;
            }

            let mut next = n - f / df;
            if !next.is_finite() || next <= lo || next >= hi {
                next = 0.5 * (lo + hi);
            }
            if (next - n).abs() <= 4.0 * f64::EPSILON * n.max(1.0) {
                return Ok(next);
            }
            n = next;
        }

        Err(ComponentError::ConvergenceFailed {
            what: "compressor speed iteration",
        })
    }
}
