//! # compecon: computational economics problem sets
//!
//! Three independent problem sets, each a library module plus a binary:
//!
//! | Problem set | Module | Binary | Description |
//! |-------------|--------|--------|-------------|
//! | PS3 | [`songs`] | `spotify-plots` | Load a song-attribute CSV, render histogram / scatter / fit / 3-D plots |
//! | PS8 | [`vfi`] | `crop-vfi` | Deterministic crop-sale savings problem solved by value function iteration |
//! | PS9 | [`olg`] | `olg-steady-state` | Steady state of an S-period OLG model with endogenous labor |
//!
//! The problem sets never call into each other. What they share is the
//! ambient plumbing: [`error`], [`config`], [`env_config`], [`report`] and
//! the binary cache in [`storage`].
//!
//! ## Numerical conventions
//!
//! - f64 throughout, `ndarray` for grids and matrices.
//! - Non-convergence is a flag on the result, never an `Err`.
//! - Domain violations inside closed-form equations (non-positive consumption,
//!   capital, labor outside its endowment) are clamped to a small positive
//!   constant instead of failing.

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod olg;
pub mod plotting;
pub mod report;
pub mod songs;
pub mod storage;
pub mod vfi;

pub use error::{Error, Result};
