use crate::IaError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute and relative tolerance used when comparing aggregates to
/// existing data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-8,
            rel: 1e-5,
        }
    }
}

impl Tolerances {
    /// Exact comparison (only bitwise-equal finite values match).
    pub const fn exact() -> Self {
        Self { abs: 0.0, rel: 0.0 }
    }
}

/// NaN never compares equal, not even to NaN.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, IaError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(IaError::NonFinite { what, value: v })
    }
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
    fn nearly_equal_default_is_loose() {
        let tol = Tolerances::default();
        assert!(nearly_equal(12.0, 12.0 + 1e-5, tol));
        assert!(!nearly_equal(12.0, 3.0, tol));
    }

    #[test]
    fn nan_never_matches() {
        assert!(!nearly_equal(Real::NAN, Real::NAN, Tolerances::default()));
        assert!(!nearly_equal(1.0, Real::NAN, Tolerances::default()));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e9f64..1e9, b in -1e9f64..1e9) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }

        #[test]
        fn relative_tolerance_scales_with_magnitude(x in 1e-3f64..1e9) {
            let tol = Tolerances { abs: 0.0, rel: 1e-5 };
            prop_assert!(nearly_equal(x, x * (1.0 + 0.5e-5), tol));
            prop_assert!(!nearly_equal(x, x * (1.0 + 2e-5), tol));
        }
    }
}
