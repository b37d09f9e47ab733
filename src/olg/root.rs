//! Newton root finder for small dense nonlinear systems.
//!
//! Each step builds a forward-difference Jacobian, solves `J dx = −f` by
//! Gaussian elimination with partial pivoting, then backtracks along `dx`
//! until `‖f‖²` decreases enough (Armijo condition on the merit function).

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::constants::*;
use crate::error::{Error, Result};

/// Stopping rule for [`solve_root`].
#[derive(Debug, Clone, Copy)]
pub struct RootOptions {
    /// Converged when `max |f_i| < tol`.
    pub tol: f64,
    pub max_iter: usize,
    /// Relative forward-difference step.
    pub jacobian_step: f64,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            tol: ROOT_TOL,
            max_iter: ROOT_MAX_ITER,
            jacobian_step: JACOBIAN_STEP,
        }
    }
}

/// Result of [`solve_root`].
#[derive(Debug, Clone)]
pub struct RootSolution {
    pub x: Array1<f64>,
    /// Residuals at `x`.
    pub fun: Array1<f64>,
    pub success: bool,
    pub iterations: usize,
}

/// Smallest step fraction tried by the line search before accepting anyway.
const MIN_STEP: f64 = 1e-10;

/// Sufficient-decrease constant of the Armijo test.
const ARMIJO_C: f64 = 1e-4;

fn sup_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

fn sq_norm(v: &Array1<f64>) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Forward-difference Jacobian of `f` at `x`, given `fx = f(x)`.
pub fn jacobian<F>(f: &mut F, x: &Array1<f64>, fx: &Array1<f64>, rel_step: f64) -> Result<Array2<f64>>
where
    F: FnMut(&Array1<f64>) -> Result<Array1<f64>>,
{
    let n = x.len();
    let m = fx.len();
    let mut jac = Array2::zeros((m, n));
    let mut xp = x.clone();
    for j in 0..n {
        let h = rel_step * x[j].abs().max(1.0);
        xp[j] = x[j] + h;
        let fp = f(&xp)?;
        xp[j] = x[j];
        for i in 0..m {
            jac[[i, j]] = (fp[i] - fx[i]) / h;
        }
    }
    Ok(jac)
}

/// Solve `a x = b` for square `a` by Gaussian elimination with partial pivoting.
pub fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    if a.dim() != (n, n) {
        return Err(Error::DimensionMismatch {
            what: "linear system rows",
            expected: n,
            actual: a.nrows(),
        });
    }

    for k in 0..n {
        let mut pivot = k;
        let mut pivot_abs = a[[k, k]].abs();
        for i in (k + 1)..n {
            let v = a[[i, k]].abs();
            if v > pivot_abs {
                pivot = i;
                pivot_abs = v;
            }
        }
        if pivot_abs == 0.0 || !pivot_abs.is_finite() {
            return Err(Error::SingularJacobian(k));
        }
        if pivot != k {
            for j in 0..n {
                a.swap([k, j], [pivot, j]);
            }
            b.swap(k, pivot);
        }
        for i in (k + 1)..n {
            let factor = a[[i, k]] / a[[k, k]];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut acc = b[i];
        for j in (i + 1)..n {
            acc -= a[[i, j]] * x[j];
        }
        x[i] = acc / a[[i, i]];
    }
    Ok(x)
}

/// Find `x` with `f(x) ≈ 0`, starting from `x0`.
///
/// Failure to reach the tolerance is reported through `success`; only a
/// singular Jacobian or an error from `f` itself is an `Err`.
pub fn solve_root<F>(mut f: F, x0: Array1<f64>, opts: &RootOptions) -> Result<RootSolution>
where
    F: FnMut(&Array1<f64>) -> Result<Array1<f64>>,
{
    let mut x = x0;
    let mut fx = f(&x)?;
    let mut iterations = 0;

    while sup_norm(&fx) >= opts.tol && iterations < opts.max_iter {
        let jac = jacobian(&mut f, &x, &fx, opts.jacobian_step)?;
        let dx = solve_linear(jac, fx.mapv(|v| -v))?;

        let merit = sq_norm(&fx);
        let mut t = 1.0;
        let (x_next, f_next) = loop {
            let trial = &x + &(&dx * t);
            let f_trial = f(&trial)?;
            let trial_merit = sq_norm(&f_trial);
            if (trial_merit.is_finite() && trial_merit <= (1.0 - ARMIJO_C * t) * merit)
                || t < MIN_STEP
            {
                break (trial, f_trial);
            }
            t *= 0.5;
        };

        x = x_next;
        fx = f_next;
        iterations += 1;
        debug!(
            "Newton iteration {}: step {:.2e}, max residual {:.3e}",
            iterations,
            t,
            sup_norm(&fx)
        );
    }

    let success = sup_norm(&fx) < opts.tol;
    Ok(RootSolution {
        x,
        fun: fx,
        success,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_solve_with_pivoting() {
        // First pivot is zero, forcing a row swap.
        let a = Array2::from_shape_vec((3, 3), vec![0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]).unwrap();
        let b = Array1::from_vec(vec![7.0, 6.0, 13.0]);
        let x = solve_linear(a, b).unwrap();
        // x = (1, 2, 3)
        assert!((x[0] - 1.0).abs() < 1e-12, "{x:?}");
        assert!((x[1] - 2.0).abs() < 1e-12, "{x:?}");
        assert!((x[2] - 3.0).abs() < 1e-12, "{x:?}");
    }

    #[test]
    fn singular_system_is_an_error() {
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        let err = solve_linear(a, Array1::from_vec(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, Error::SingularJacobian(1)));
    }

    #[test]
    fn jacobian_of_linear_map_is_exact() {
        let mut f = |x: &Array1<f64>| -> Result<Array1<f64>> {
            Ok(Array1::from_vec(vec![2.0 * x[0] + x[1], -x[1]]))
        };
        let x = Array1::from_vec(vec![0.3, 0.7]);
        let fx = f(&x).unwrap();
        let j = jacobian(&mut f, &x, &fx, 1e-7).unwrap();
        assert!((j[[0, 0]] - 2.0).abs() < 1e-6);
        assert!((j[[0, 1]] - 1.0).abs() < 1e-6);
        assert!(j[[1, 0]].abs() < 1e-6);
        assert!((j[[1, 1]] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn solves_nonlinear_system() {
        // x² + y² = 4, x = y → (√2, √2)
        let f = |v: &Array1<f64>| {
            Ok(Array1::from_vec(vec![v[0] * v[0] + v[1] * v[1] - 4.0, v[0] - v[1]]))
        };
        let sol = solve_root(f, Array1::from_vec(vec![1.0, 0.5]), &RootOptions::default()).unwrap();
        assert!(sol.success);
        let s2 = 2f64.sqrt();
        assert!((sol.x[0] - s2).abs() < 1e-8);
        assert!((sol.x[1] - s2).abs() < 1e-8);
    }

    #[test]
    fn line_search_handles_far_start() {
        // atan has a tiny derivative far from 0; full Newton steps overshoot.
        let f = |v: &Array1<f64>| Ok(Array1::from_vec(vec![v[0].atan()]));
        let sol = solve_root(f, Array1::from_vec(vec![3.0]), &RootOptions::default()).unwrap();
        assert!(sol.success, "{sol:?}");
        assert!(sol.x[0].abs() < 1e-8);
    }

    #[test]
    fn already_solved_takes_no_steps() {
        let f = |v: &Array1<f64>| Ok(v.clone());
        let sol = solve_root(f, Array1::zeros(3), &RootOptions::default()).unwrap();
        assert!(sol.success);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn iteration_cap_reports_failure() {
        // No real root.
        let f = |v: &Array1<f64>| Ok(Array1::from_vec(vec![v[0] * v[0] + 1.0]));
        let opts = RootOptions {
            max_iter: 5,
            ..RootOptions::default()
        };
        match solve_root(f, Array1::from_vec(vec![1.0]), &opts) {
            Ok(sol) => {
                assert!(!sol.success);
                assert!(sol.iterations <= 5);
            }
            Err(Error::SingularJacobian(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
