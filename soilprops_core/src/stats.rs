//! Statistics helpers for calibration and fit acceptance.
//!
//! All routines mask missing values: a pair with `NaN` on either side is
//! excluded rather than poisoning the result.

/// Element-wise comparison with absolute tolerance, skipping pairs where
/// either side is `NaN`. Slices of different lengths are never similar.
pub fn arrays_are_similar(a: &[f64], b: &[f64], tol: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .all(|(x, y)| (x - y).abs() <= tol)
}

/// Masked coefficient of determination.
///
/// Returns `NaN` when fewer than two valid pairs remain or the observations
/// have zero variance.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, p)| !a.is_nan() && !p.is_nan())
        .map(|(a, p)| (*a, *p))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let mean = pairs.iter().map(|(a, _)| a).sum::<f64>() / pairs.len() as f64;
    let ss_tot: f64 = pairs.iter().map(|(a, _)| (a - mean).powi(2)).sum();
    let ss_res: f64 = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum();
    if ss_tot == 0.0 {
        return f64::NAN;
    }
    1.0 - ss_res / ss_tot
}

/// Smallest and largest finite value of a slice.
pub fn finite_range(xs: &[f64]) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for &x in xs {
        if !x.is_finite() {
            continue;
        }
        range = Some(match range {
            None => (x, x),
            Some((lo, hi)) => (lo.min(x), hi.max(x)),
        });
    }
    range
}

/// True when the finite values of a slice span no more than `tol`, i.e. the
/// slice cannot anchor a regression.
pub fn is_degenerate_range(xs: &[f64], tol: f64) -> bool {
    match finite_range(xs) {
        Some((lo, hi)) => hi - lo <= tol,
        None => true,
    }
}
