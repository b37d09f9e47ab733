//! Value function iteration for the crop problem.
//!
//! Repeats the Bellman operator
//!
//! ```text
//! Vmat[i, j] = U[i, j] + β V[j]
//! TV[i]      = max_j Vmat[i, j]
//! PF[i]      = argmax_j Vmat[i, j]   (first maximum wins)
//! ```
//!
//! until `max |V − TV| ≤ tol` or the iteration counter reaches `max_iter`.
//! The operator is a β-contraction in the sup norm, so the distance trace is
//! non-increasing.
//!
//! Rows are independent and evaluated with rayon `par_iter`. Results are
//! collected in row order, so the output matches the sequential loop exactly.

use std::time::Instant;

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::model::CropModel;
use crate::constants::*;

/// Stopping rule for [`solve`].
#[derive(Debug, Clone, Copy)]
pub struct VfiSettings {
    pub tol: f64,
    pub max_iter: usize,
    /// Keep every iterate in [`VfiSolution::history`] (`size × max_iter` f64).
    pub record_history: bool,
}

impl Default for VfiSettings {
    fn default() -> Self {
        Self {
            tol: VF_TOL,
            max_iter: VF_MAX_ITER,
            record_history: false,
        }
    }
}

/// Output of value function iteration.
#[derive(Debug)]
pub struct VfiSolution {
    /// Value function V(q) on the grid.
    pub value: Array1<f64>,
    /// Policy as grid indices: leftover crop is `grid[policy[i]]`.
    pub policy: Vec<usize>,
    /// Optimal leftover crop (savings function).
    pub leftover: Array1<f64>,
    /// Optimal sales `q − leftover`.
    pub sales: Array1<f64>,
    /// Loop counter at exit. Starts at 1, so this is one more than the
    /// number of Bellman updates performed.
    pub iterations: usize,
    /// Sup-norm distance of the last update.
    pub distance: f64,
    /// Sup-norm distance of every update, in order.
    pub distances: Vec<f64>,
    pub converged: bool,
    /// Column `k` holds the iterate entering update `k`; column 0 is unused.
    pub history: Option<Array2<f64>>,
}

/// One application of the Bellman operator. Returns (TV, PF).
pub fn bellman_update(model: &CropModel, v: &Array1<f64>) -> (Array1<f64>, Vec<usize>) {
    let beta = model.params.beta;
    let n = model.size();
    let utility = &model.utility;

    let rows: Vec<(f64, usize)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let row = utility.row(i);
            let mut best = f64::NEG_INFINITY;
            let mut best_j = 0;
            for j in 0..n {
                let val = row[j] + beta * v[j];
                if val > best {
                    best = val;
                    best_j = j;
                }
            }
            (best, best_j)
        })
        .collect();

    let tv = Array1::from_iter(rows.iter().map(|&(val, _)| val));
    let pf = rows.into_iter().map(|(_, j)| j).collect();
    (tv, pf)
}

/// Sup-norm distance between two iterates.
pub fn sup_distance(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Solve the crop problem from V = 0.
pub fn solve(model: &CropModel, settings: &VfiSettings) -> VfiSolution {
    solve_from(model, settings, Array1::zeros(model.size()))
}

/// Solve the crop problem starting from `v0`.
pub fn solve_from(model: &CropModel, settings: &VfiSettings, v0: Array1<f64>) -> VfiSolution {
    let n = model.size();
    let t_start = Instant::now();

    let mut v = v0;
    let mut policy = vec![0usize; n];
    let mut history = settings
        .record_history
        .then(|| Array2::<f64>::zeros((n, settings.max_iter)));
    let mut distances = Vec::new();
    let mut dist = VF_INITIAL_DIST;
    let mut iter = 1;

    while dist > settings.tol && iter < settings.max_iter {
        if let Some(store) = history.as_mut() {
            store.column_mut(iter).assign(&v);
        }
        let (tv, pf) = bellman_update(model, &v);
        dist = sup_distance(&v, &tv);
        distances.push(dist);
        v = tv;
        policy = pf;
        iter += 1;

        if iter % 100 == 0 {
            debug!("VFI iteration {}: distance {:.3e}", iter, dist);
        }
    }

    let converged = iter < settings.max_iter;
    let elapsed = t_start.elapsed().as_secs_f64();
    if converged {
        info!(
            "Value function converged after {} iterations ({:.2} s, distance {:.3e})",
            iter, elapsed, dist
        );
    } else {
        warn!(
            "Value function did not converge after {} iterations (distance {:.3e})",
            iter, dist
        );
    }

    let leftover = Array1::from_iter(policy.iter().map(|&j| model.grid[j]));
    let sales = &model.grid - &leftover;

    VfiSolution {
        value: v,
        policy,
        leftover,
        sales,
        iterations: iter,
        distance: dist,
        distances,
        converged,
        history,
    }
}
