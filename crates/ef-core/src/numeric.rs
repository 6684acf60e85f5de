use crate::EfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
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

impl Tolerances {
    /// Relative-only tolerance, e.g. `Tolerances::relative(0.05)` for "within 5%".
    pub fn relative(rel: Real) -> Self {
        Self { abs: 0.0, rel }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, EfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EfError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, EfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(EfError::InvalidArg { what, value: v })
    }
}

/// Finite and greater than or equal to zero.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, EfError> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(EfError::InvalidArg { what, value: v })
    }
}

/// `n` evenly spaced points from `start` to `end`, endpoint exact.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            points[n - 1] = end;
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn relative_tolerance() {
        let tol = Tolerances::relative(0.05);
        assert!(nearly_equal(20.62, 20.0, tol));
        assert!(!nearly_equal(20.62, 19.0, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1.0, "mass").is_ok());
        assert_eq!(
            ensure_positive(0.0, "mass"),
            Err(EfError::InvalidArg {
                what: "mass",
                value: 0.0
            })
        );
        assert!(ensure_positive(-2.0, "mass").is_err());
        assert!(ensure_positive(Real::INFINITY, "mass").is_err());
    }

    #[test]
    fn ensure_non_negative_allows_zero() {
        assert!(ensure_non_negative(0.0, "h").is_ok());
        assert!(ensure_non_negative(-1e-9, "h").is_err());
    }

    #[test]
    fn linspace_endpoints() {
        let pts = linspace(310.0, 500.0, 5);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], 310.0);
        assert_eq!(pts[4], 500.0);
        assert!((pts[2] - 405.0).abs() < 1e-9);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_monotone(start in -1e3_f64..1e3, span in 1e-3_f64..1e3, n in 2_usize..200) {
            let pts = linspace(start, start + span, n);
            prop_assert_eq!(pts.len(), n);
            for w in pts.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
        }
    }
}
