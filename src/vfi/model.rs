//! Crop-sale savings problem: parameters, state grid and utility matrix.
//!
//! A farmer holding crop q sells q − l/R today and carries l into tomorrow.
//! The Bellman equation is
//!
//! ```text
//! V(q) = max_{l ∈ grid} u(q − l/R) + β V(l)
//! ```
//!
//! Everything that does not depend on V is precomputed here: the grid and the
//! `size × size` matrix `U[i, j] = u(q_i − q_j / R)`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Calibration of the crop problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropParams {
    /// Discount factor β.
    pub beta: f64,
    /// Relative risk aversion σ.
    pub sigma: f64,
    /// Gross return R on leftover crop.
    pub gross_return: f64,
    pub grid_lb: f64,
    pub grid_ub: f64,
    pub grid_size: usize,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            beta: CROP_BETA,
            sigma: CROP_SIGMA,
            gross_return: CROP_RETURN,
            grid_lb: CROP_GRID_LB,
            grid_ub: CROP_GRID_UB,
            grid_size: CROP_GRID_SIZE,
        }
    }
}

/// `n` evenly spaced points from `lb` to `ub`, both ends included.
pub fn linspace(lb: f64, ub: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, lb),
        _ => {
            let step = (ub - lb) / (n - 1) as f64;
            Array1::from_shape_fn(n, |i| if i == n - 1 { ub } else { lb + step * i as f64 })
        }
    }
}

/// CRRA utility: `ln c` for σ = 1, `c^(1−σ) / (1−σ)` otherwise.
#[inline]
pub fn crra_utility(c: f64, sigma: f64) -> f64 {
    if sigma == 1.0 {
        c.ln()
    } else {
        c.powf(1.0 - sigma) / (1.0 - sigma)
    }
}

/// Two-period value of selling `q − l` now at price `pi` and `l` next period.
#[inline]
pub fn profit(pi: f64, q: f64, l: f64, beta: f64) -> f64 {
    pi * (q - l) + beta * pi * l
}

/// Sales implied by holding `q` and carrying `l`, floored at [`MIN_SALES`].
#[inline]
pub fn clamped_sales(q: f64, l: f64, gross_return: f64) -> f64 {
    let sales = q - l / gross_return;
    if sales <= 0.0 {
        MIN_SALES
    } else {
        sales
    }
}

/// Precomputed state space for the crop problem.
pub struct CropModel {
    pub params: CropParams,
    /// Crop-size grid q.
    pub grid: Array1<f64>,
    /// `U[i, j]`: utility of holding `grid[i]` and carrying `grid[j]`.
    pub utility: Array2<f64>,
}

impl CropModel {
    pub fn new(params: CropParams) -> Self {
        let grid = linspace(params.grid_lb, params.grid_ub, params.grid_size);
        let n = grid.len();
        let utility = Array2::from_shape_fn((n, n), |(i, j)| {
            let sales = clamped_sales(grid[i], grid[j], params.gross_return);
            crra_utility(sales, params.sigma)
        });
        Self {
            params,
            grid,
            utility,
        }
    }

    pub fn size(&self) -> usize {
        self.grid.len()
    }
}
