//! Calibration constants and numerical guards.
//!
//! Maps problem-set notation to concrete values:
//! - PS8: β = [`CROP_BETA`], σ = [`CROP_SIGMA`], R = [`CROP_RETURN`],
//!   q ∈ [[`CROP_GRID_LB`], [`CROP_GRID_UB`]] with [`CROP_GRID_SIZE`] points
//! - PS9: α = [`OLG_ALPHA`], δ = [`OLG_DELTA`], A = [`OLG_TFP`], S = [`OLG_PERIODS`]
//!
//! Tolerances and iteration caps sit next to the calibration they belong to.

// ── PS8: crop-sale savings problem ───────────────────────────────────

/// Discount factor on crop carried into the next period.
pub const CROP_BETA: f64 = 0.9;

/// Coefficient of relative risk aversion. σ = 1 selects log utility.
pub const CROP_SIGMA: f64 = 1.0;

/// Gross return on leftover crop.
pub const CROP_RETURN: f64 = 1.0;

/// Lower bound of the crop-size grid.
pub const CROP_GRID_LB: f64 = 0.4;

/// Upper bound of the crop-size grid.
pub const CROP_GRID_UB: f64 = 2.0;

/// Number of grid points in the crop state space.
pub const CROP_GRID_SIZE: usize = 1500;

/// Sales at or below zero are replaced by this value before utility is applied.
pub const MIN_SALES: f64 = 1e-15;

/// Sup-norm tolerance on successive value-function iterates.
pub const VF_TOL: f64 = 1e-8;

/// Iteration cap for value function iteration.
pub const VF_MAX_ITER: usize = 3000;

/// Initial distance, anything above [`VF_TOL`] starts the loop.
pub const VF_INITIAL_DIST: f64 = 7.0;

// ── PS9: OLG steady state ────────────────────────────────────────────

/// Capital share of output.
pub const OLG_ALPHA: f64 = 0.3;

/// Per-period depreciation rate.
pub const OLG_DELTA: f64 = 0.1;

/// Total factor productivity.
pub const OLG_TFP: f64 = 1.0;

/// Coefficient of relative risk aversion.
pub const OLG_SIGMA: f64 = 1.5;

/// Per-period discount factor.
pub const OLG_BETA: f64 = 0.96;

/// Scale parameter of the elliptical labor disutility.
pub const OLG_ELLIPSE_B: f64 = 0.501;

/// Shape parameter of the elliptical labor disutility.
pub const OLG_ELLIPSE_UPSILON: f64 = 1.554;

/// Per-period time endowment.
pub const OLG_TIME_ENDOWMENT: f64 = 1.0;

/// Number of periods an agent lives.
pub const OLG_PERIODS: usize = 80;

/// Initial guess for the steady-state interest rate.
pub const OLG_R_GUESS: f64 = 0.1;

/// Initial guess for every savings choice b_{s+1}.
pub const OLG_SAVINGS_GUESS: f64 = 0.01;

/// Initial guess for every labor choice n_s.
pub const OLG_LABOR_GUESS: f64 = 0.8;

/// Weight on the old rate in the damped update r ← ξ r + (1 − ξ) r'.
pub const OLG_DAMPING: f64 = 0.95;

/// Tolerance on the squared distance (r − r')².
pub const SS_TOL: f64 = 1e-8;

/// Outer-loop iteration cap for the steady-state solver.
pub const SS_MAX_ITER: usize = 500;

/// Initial distance, anything above [`SS_TOL`] starts the loop.
pub const SS_INITIAL_DIST: f64 = 7.0;

/// Floor for consumption, labor, capital and (r + δ) in closed-form equations.
pub const DOMAIN_EPSILON: f64 = 1e-10;

// ── Root finder ──────────────────────────────────────────────────────

/// Sup-norm residual tolerance of the Newton root finder.
pub const ROOT_TOL: f64 = 1e-9;

/// Newton iteration cap.
pub const ROOT_MAX_ITER: usize = 200;

/// Relative step for forward-difference Jacobian columns.
pub const JACOBIAN_STEP: f64 = 1e-7;

// ── PS3: song plots ──────────────────────────────────────────────────

/// Default CSV file name.
pub const SONGS_CSV: &str = "Spotify-2000.csv";

/// Rows shown by `head()` when no count is given.
pub const HEAD_ROWS: usize = 5;

/// Marker opacity for the plain scatter plot.
pub const SCATTER_ALPHA: f64 = 0.15;

/// Marker opacity for the 3-D scatter plot.
pub const SCATTER_3D_ALPHA: f64 = 0.1;

/// Camera elevation of the 3-D scatter plot, in degrees.
pub const VIEW_ELEVATION_DEG: f64 = 50.0;

/// Camera azimuth of the 3-D scatter plot, in degrees.
pub const VIEW_AZIMUTH_DEG: f64 = 15.0;
