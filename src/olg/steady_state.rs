//! Steady-state solver for the S-period OLG model.
//!
//! Fixed point on the interest rate:
//!
//! 1. `w = wage(r)` from the firm FOCs
//! 2. solve the household Euler system at (r, w), warm-started at the previous `bn`
//! 3. `K = Σ b`, `L = Σ n`, `r' = interest_rate(K, L)`
//! 4. `dist = (r − r')²`, `r ← ξ r + (1 − ξ) r'`
//!
//! until `dist ≤ tol` or the iteration cap. A run only counts as a success
//! when the loop stopped on tolerance, the last household solve converged and
//! aggregate capital is positive. Without the last condition, calibrations
//! whose households want to borrow "converge" onto the clamp in
//! [`interest_rate`].

use std::borrow::Cow;
use std::time::Instant;

use ndarray::Array1;
use tracing::{debug, info, warn};

use super::equations::{
    aggregate_capital, aggregate_labor, interest_rate, output, wage, FirmParams,
};
use super::household::{household_foc, HouseholdParams, LifeCycle};
use super::root::{solve_root, RootOptions};
use crate::constants::*;
use crate::error::{Error, Result};

/// Outer-loop controls.
#[derive(Debug, Clone, Copy)]
pub struct SteadyStateSettings {
    /// Weight ξ on the old rate in the damped update.
    pub damping: f64,
    /// Tolerance on (r − r')².
    pub tol: f64,
    pub max_iter: usize,
    /// Household root-finder controls.
    pub root: RootOptions,
}

impl Default for SteadyStateSettings {
    fn default() -> Self {
        Self {
            damping: OLG_DAMPING,
            tol: SS_TOL,
            max_iter: SS_MAX_ITER,
            root: RootOptions::default(),
        }
    }
}

/// Solved steady state and derived aggregates.
#[derive(Debug, Clone)]
pub struct SteadyState {
    /// Interest rate after the final damped update.
    pub r: f64,
    /// Wage at `r`.
    pub w: f64,
    /// `[b_2..b_S, n_1..n_S]` from the last household solve.
    pub bn: Array1<f64>,
    /// Household Euler errors at `bn`.
    pub euler_errors: Array1<f64>,
    pub success: bool,
    /// Outer loop stopped on tolerance rather than the cap.
    pub converged: bool,
    /// Last household solve reached its tolerance.
    pub household_converged: bool,
    pub iterations: usize,
    /// Final (r − r')².
    pub distance: f64,
    pub capital: f64,
    pub labor: f64,
    /// Rate implied by (capital, labor) through the firm FOC.
    pub implied_r: f64,
    pub output: f64,
    /// Consumption c_1..c_S at (r, w).
    pub consumption: Vec<f64>,
    pub aggregate_consumption: f64,
    /// `Y − C − δK`.
    pub resource_error: f64,
}

impl SteadyState {
    fn periods(&self) -> usize {
        (self.bn.len() + 1) / 2
    }

    /// Savings b_2..b_S.
    pub fn savings(&self) -> Vec<f64> {
        self.bn.iter().take(self.periods() - 1).copied().collect()
    }

    /// Labor supply n_1..n_S.
    pub fn labor_supply(&self) -> Vec<f64> {
        self.bn.iter().skip(self.periods() - 1).copied().collect()
    }

    pub fn max_euler_error(&self) -> f64 {
        self.euler_errors.iter().fold(0.0, |m, e| m.max(e.abs()))
    }
}

fn contiguous(x: &Array1<f64>) -> Cow<'_, [f64]> {
    match x.as_slice() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(x.to_vec()),
    }
}

/// Solve for the steady state from an interest-rate guess and household guess.
pub fn solve_steady_state(
    r_guess: f64,
    bn_guess: Array1<f64>,
    firm: &FirmParams,
    hh: &HouseholdParams,
    settings: &SteadyStateSettings,
) -> Result<SteadyState> {
    let periods = hh.periods();
    if bn_guess.len() != hh.unknowns() {
        return Err(Error::DimensionMismatch {
            what: "steady-state initial guess (2S - 1)",
            expected: hh.unknowns(),
            actual: bn_guess.len(),
        });
    }

    let t_start = Instant::now();
    let xi = settings.damping;
    let mut r = r_guess;
    let mut bn = bn_guess;
    let mut euler_errors = Array1::zeros(bn.len());
    let mut household_converged = false;
    let mut dist = SS_INITIAL_DIST;
    let mut iter = 0;
    let mut capital = 0.0;
    let mut labor = 0.0;
    let mut implied_r = r;

    info!(
        "Solving OLG steady state: S={}, r0={:.4}, damping={}",
        periods, r_guess, xi
    );

    while dist > settings.tol && iter < settings.max_iter {
        let w = wage(r, firm);
        let sol = solve_root(
            |x: &Array1<f64>| household_foc(&contiguous(x), r, w, hh),
            bn,
            &settings.root,
        )?;
        bn = sol.x;
        euler_errors = sol.fun;
        household_converged = sol.success;
        if !household_converged {
            debug!("Household solve did not converge at r={:.6}", r);
        }

        let bn_slice = contiguous(&bn);
        let path = LifeCycle::split(&bn_slice, periods)?;
        capital = aggregate_capital(path.savings);
        labor = aggregate_labor(path.labor);
        implied_r = interest_rate(capital, labor, firm);
        dist = (r - implied_r).powi(2);
        iter += 1;
        debug!(
            "SS iteration {}: r={:.8}, r'={:.8}, K={:.6}, L={:.6}, dist={:.3e}",
            iter, r, implied_r, capital, labor, dist
        );
        r = xi * r + (1.0 - xi) * implied_r;
    }

    let converged = iter < settings.max_iter;
    let success = converged && household_converged && capital > 0.0;

    let w = wage(r, firm);
    let consumption = LifeCycle::split(&contiguous(&bn), periods)?.consumption(r, w);
    let aggregate_consumption: f64 = consumption.iter().sum();
    let y = output(capital, labor, firm);
    let resource_error = y - aggregate_consumption - firm.delta * capital;

    let elapsed = t_start.elapsed().as_secs_f64();
    if success {
        info!(
            "Steady state found after {} iterations ({:.2} s): r={:.6}, w={:.6}, K={:.4}, L={:.4}",
            iter, elapsed, r, w, capital, labor
        );
    } else {
        warn!(
            "Steady state not found: iterations={}, converged={}, household_converged={}, K={:.4}",
            iter, converged, household_converged, capital
        );
    }

    Ok(SteadyState {
        r,
        w,
        bn,
        euler_errors,
        success,
        converged,
        household_converged,
        iterations: iter,
        distance: dist,
        capital,
        labor,
        implied_r,
        output: y,
        consumption,
        aggregate_consumption,
        resource_error,
    })
}
