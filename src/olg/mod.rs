//! Steady state of an S-period overlapping-generations model with
//! endogenous labor supply.

pub mod equations;
pub mod household;
pub mod plots;
pub mod root;
pub mod steady_state;

pub use equations::{
    aggregate_capital, aggregate_labor, consumption, interest_rate, marginal_disutility_labor,
    marginal_utility_consumption, output, wage, FirmParams,
};
pub use household::{household_foc, HouseholdParams, LifeCycle};
pub use plots::lifecycle_plot;
pub use root::{solve_root, RootOptions, RootSolution};
pub use steady_state::{solve_steady_state, SteadyState, SteadyStateSettings};
