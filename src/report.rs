//! JSON summaries of solver runs.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::olg::{FirmParams, HouseholdParams, SteadyState};
use crate::songs::{LinearFit, Summary};
use crate::vfi::{CropModel, CropParams, VfiSolution};

/// Crop problem: calibration, convergence and policies on the grid.
#[derive(Debug, Serialize)]
pub struct VfiReport {
    pub params: CropParams,
    pub converged: bool,
    pub iterations: usize,
    pub distance: f64,
    pub distances: Vec<f64>,
    pub grid: Vec<f64>,
    pub value: Vec<f64>,
    pub leftover: Vec<f64>,
    pub sales: Vec<f64>,
}

impl VfiReport {
    pub fn new(model: &CropModel, solution: &VfiSolution) -> Self {
        Self {
            params: model.params,
            converged: solution.converged,
            iterations: solution.iterations,
            distance: solution.distance,
            distances: solution.distances.clone(),
            grid: model.grid.to_vec(),
            value: solution.value.to_vec(),
            leftover: solution.leftover.to_vec(),
            sales: solution.sales.to_vec(),
        }
    }
}

/// OLG steady state: prices, aggregates and the household path.
#[derive(Debug, Serialize)]
pub struct SteadyStateReport {
    pub firm: FirmParams,
    pub household: HouseholdParams,
    pub success: bool,
    pub converged: bool,
    pub household_converged: bool,
    pub iterations: usize,
    pub distance: f64,
    pub r: f64,
    pub w: f64,
    pub implied_r: f64,
    pub capital: f64,
    pub labor: f64,
    pub output: f64,
    pub aggregate_consumption: f64,
    pub resource_error: f64,
    pub max_euler_error: f64,
    pub savings: Vec<f64>,
    pub labor_supply: Vec<f64>,
    pub consumption: Vec<f64>,
}

impl SteadyStateReport {
    pub fn new(firm: &FirmParams, household: &HouseholdParams, ss: &SteadyState) -> Self {
        Self {
            firm: *firm,
            household: household.clone(),
            success: ss.success,
            converged: ss.converged,
            household_converged: ss.household_converged,
            iterations: ss.iterations,
            distance: ss.distance,
            r: ss.r,
            w: ss.w,
            implied_r: ss.implied_r,
            capital: ss.capital,
            labor: ss.labor,
            output: ss.output,
            aggregate_consumption: ss.aggregate_consumption,
            resource_error: ss.resource_error,
            max_euler_error: ss.max_euler_error(),
            savings: ss.savings(),
            labor_supply: ss.labor_supply(),
            consumption: ss.consumption.clone(),
        }
    }
}

/// Column summaries and the fitted line of one plotting run.
#[derive(Debug, Default, Serialize)]
pub struct SongsReport {
    pub rows: usize,
    pub summaries: Vec<(String, Summary)>,
    pub fits: Vec<FitReport>,
    pub plots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FitReport {
    pub x: String,
    pub y: String,
    #[serde(flatten)]
    pub fit: LinearFit,
}

/// Pretty-print `report` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfi::{solve, VfiSettings};

    #[test]
    fn vfi_report_round_trips_through_json() {
        let model = CropModel::new(CropParams {
            grid_size: 11,
            ..CropParams::default()
        });
        let solution = solve(&model, &VfiSettings::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/vfi.json");
        write_json(&path, &VfiReport::new(&model, &solution)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["grid"].as_array().unwrap().len(), 11);
        assert_eq!(v["params"]["grid_size"], 11);
        assert_eq!(v["converged"], solution.converged);
    }

    #[test]
    fn fit_fields_are_flattened() {
        let report = FitReport {
            x: "Danceability".into(),
            y: "Popularity".into(),
            fit: LinearFit {
                slope: 0.5,
                intercept: 40.0,
            },
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["slope"], 0.5);
        assert_eq!(v["intercept"], 40.0);
    }
}
