//! PS8: deterministic crop-sale savings problem solved by value function iteration.
//!
//! - [`model`]: calibration, crop grid and the current-utility matrix
//! - [`iteration`]: the Bellman fixed-point loop and derived policies
//! - [`plots`]: value-function and policy PNGs
//!
//! Solutions can be cached on disk with [`crate::storage`].

pub mod iteration;
pub mod model;
pub mod plots;

pub use iteration::{bellman_update, solve, solve_from, sup_distance, VfiSettings, VfiSolution};
pub use model::{clamped_sales, crra_utility, linspace, profit, CropModel, CropParams};
