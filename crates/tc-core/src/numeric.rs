use crate::{TcError, TcResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> TcResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TcError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> TcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TcError::OutOfRange {
            what,
            value: v,
            expected: "> 0",
        })
    }
}

/// Finite and within `(0, 1]`, the admissible range for efficiencies and loss ratios.
pub fn ensure_unit_fraction(v: Real, what: &'static str) -> TcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 && v <= 1.0 {
        Ok(v)
    } else {
        Err(TcError::OutOfRange {
            what,
            value: v,
            expected: "in (0, 1]",
        })
    }
}

/// Euclidean norm of a slice.
pub fn l2_norm(values: &[Real]) -> Real {
    values.iter().map(|v| v * v).sum::<Real>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "mass flow").is_err());
        assert!(ensure_positive(-1.0, "mass flow").is_err());
        assert_eq!(ensure_positive(2.5, "mass flow").unwrap(), 2.5);
    }

    #[test]
    fn unit_fraction_bounds() {
        assert!(ensure_unit_fraction(1.0, "eta").is_ok());
        assert!(ensure_unit_fraction(0.0, "eta").is_err());
        assert!(ensure_unit_fraction(1.01, "eta").is_err());
    }

    #[test]
    fn norm_of_pythagorean_triple() {
        assert!(nearly_equal(l2_norm(&[3.0, 4.0]), 5.0, Tolerances::default()));
        assert_eq!(l2_norm(&[]), 0.0);
    }

    proptest! {
        #[test]
        fn norm_is_scale_homogeneous(a in -1e3f64..1e3, b in -1e3f64..1e3, s in 0.0f64..10.0) {
            let lhs = l2_norm(&[s * a, s * b]);
            let rhs = s * l2_norm(&[a, b]);
            prop_assert!((lhs - rhs).abs() <= 1e-9 * rhs.max(1.0));
        }
    }
}
