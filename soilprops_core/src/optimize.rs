//! Bounded deterministic minimizers.
//!
//! The fitted and inverted model routes need nothing more than a scalar
//! minimum inside known physical bounds, so a golden-section search (and a
//! coordinate-descent wrapper for two-parameter fits) is used instead of a
//! general optimizer. Non-convergence is soft: the best estimate found
//! within the iteration cap is returned and the caller decides what to do
//! with it.

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Outcome of a scalar minimization.
#[derive(Debug, Clone, Copy)]
pub struct Minimum {
    pub x: f64,
    pub fx: f64,
    pub converged: bool,
}

/// Outcome of a two-parameter minimization.
#[derive(Debug, Clone, Copy)]
pub struct PairMinimum {
    pub a: f64,
    pub b: f64,
    pub fx: f64,
    pub converged: bool,
}

/// Golden-section search for the minimum of `f` on `[lo, hi]`.
///
/// Assumes `f` is unimodal on the interval, which holds for the squared
/// residuals of the monotonic model curves inverted here. `NaN` objective
/// values are treated as worse than any number so the search backs away
/// from undefined regions; if `f` is `NaN` everywhere the result's `fx`
/// is `NaN` and the caller skips the write.
pub fn minimize_scalar<F>(f: F, lo: f64, hi: f64, max_iter: usize, tol: f64) -> Minimum
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lo, hi);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = f(c);
    let mut fd = f(d);
    let mut converged = false;

    for _ in 0..max_iter {
        if (b - a).abs() <= tol {
            converged = true;
            break;
        }
        if fc < fd || fd.is_nan() {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = f(d);
        }
    }

    let x = 0.5 * (a + b);
    Minimum { x, fx: f(x), converged }
}

/// Coordinate descent over two bounded scalars, `sweeps` alternating
/// golden-section passes starting from `init`.
pub fn minimize_pair<F>(
    f: F,
    a_bounds: (f64, f64),
    b_bounds: (f64, f64),
    init: (f64, f64),
    sweeps: usize,
    max_iter: usize,
    tol: f64,
) -> PairMinimum
where
    F: Fn(f64, f64) -> f64,
{
    let (mut a, mut b) = init;
    let mut fx = f(a, b);
    let mut converged = false;

    for _ in 0..sweeps {
        let ra = minimize_scalar(|x| f(x, b), a_bounds.0, a_bounds.1, max_iter, tol);
        let rb = minimize_scalar(|y| f(ra.x, y), b_bounds.0, b_bounds.1, max_iter, tol);
        let prev = fx;
        a = ra.x;
        b = rb.x;
        fx = rb.fx;
        if (prev - fx).abs() <= tol {
            converged = true;
            break;
        }
    }

    PairMinimum { a, b, fx, converged }
}
