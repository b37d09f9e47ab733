//! Configuration models for the problem-set binaries.
//!
//! Every field defaults to the calibration in [`crate::constants`], so an
//! empty TOML file (or no file at all) reproduces the reference calibration. A file
//! only needs the keys it overrides:
//!
//! ```toml
//! [olg]
//! periods = 20
//! damping = 0.8
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::olg::{FirmParams, HouseholdParams, SteadyStateSettings};
use crate::plotting::PlotStyle;
use crate::vfi::{CropParams, VfiSettings};

/// Top-level configuration file. Each section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub songs: SongsConfig,
    pub crop: CropConfig,
    pub olg: OlgConfig,
    /// PNG canvas size shared by every plot.
    pub plot: PlotStyle,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read config file {}", path.display()), e))?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load from `path` when given, otherwise return the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// PS3 plot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SongsConfig {
    /// Input CSV.
    pub csv: PathBuf,
    /// Directory receiving the PNG files.
    pub output_dir: PathBuf,
}

impl Default for SongsConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from(SONGS_CSV),
            output_dir: PathBuf::from("."),
        }
    }
}

/// PS8 calibration and solver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub beta: f64,
    pub sigma: f64,
    pub gross_return: f64,
    pub grid_lb: f64,
    pub grid_ub: f64,
    pub grid_size: usize,
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            beta: CROP_BETA,
            sigma: CROP_SIGMA,
            gross_return: CROP_RETURN,
            grid_lb: CROP_GRID_LB,
            grid_ub: CROP_GRID_UB,
            grid_size: CROP_GRID_SIZE,
            tol: VF_TOL,
            max_iter: VF_MAX_ITER,
        }
    }
}

impl CropConfig {
    pub fn params(&self) -> CropParams {
        CropParams {
            beta: self.beta,
            sigma: self.sigma,
            gross_return: self.gross_return,
            grid_lb: self.grid_lb,
            grid_ub: self.grid_ub,
            grid_size: self.grid_size,
        }
    }

    pub fn settings(&self, record_history: bool) -> VfiSettings {
        VfiSettings {
            tol: self.tol,
            max_iter: self.max_iter,
            record_history,
        }
    }
}

/// PS9 calibration, initial guesses and solver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OlgConfig {
    pub alpha: f64,
    pub delta: f64,
    pub tfp: f64,
    pub sigma: f64,
    pub beta: f64,
    pub ellipse_b: f64,
    pub upsilon: f64,
    pub time_endowment: f64,
    pub periods: usize,
    /// Per-age labor disutility weights. Defaults to ones.
    pub chi: Option<Vec<f64>>,
    pub r_guess: f64,
    pub savings_guess: f64,
    pub labor_guess: f64,
    pub damping: f64,
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for OlgConfig {
    fn default() -> Self {
        Self {
            alpha: OLG_ALPHA,
            delta: OLG_DELTA,
            tfp: OLG_TFP,
            sigma: OLG_SIGMA,
            beta: OLG_BETA,
            ellipse_b: OLG_ELLIPSE_B,
            upsilon: OLG_ELLIPSE_UPSILON,
            time_endowment: OLG_TIME_ENDOWMENT,
            periods: OLG_PERIODS,
            chi: None,
            r_guess: OLG_R_GUESS,
            savings_guess: OLG_SAVINGS_GUESS,
            labor_guess: OLG_LABOR_GUESS,
            damping: OLG_DAMPING,
            tol: SS_TOL,
            max_iter: SS_MAX_ITER,
        }
    }
}

impl OlgConfig {
    pub fn firm(&self) -> FirmParams {
        FirmParams {
            alpha: self.alpha,
            delta: self.delta,
            tfp: self.tfp,
        }
    }

    pub fn household(&self) -> Result<HouseholdParams> {
        let chi = self
            .chi
            .clone()
            .unwrap_or_else(|| vec![1.0; self.periods]);
        if chi.len() != self.periods {
            return Err(Error::DimensionMismatch {
                what: "chi weights per period",
                expected: self.periods,
                actual: chi.len(),
            });
        }
        HouseholdParams::new(
            self.sigma,
            chi,
            self.time_endowment,
            self.upsilon,
            self.ellipse_b,
            self.beta,
        )
    }

    pub fn settings(&self) -> SteadyStateSettings {
        SteadyStateSettings {
            damping: self.damping,
            tol: self.tol,
            max_iter: self.max_iter,
            ..SteadyStateSettings::default()
        }
    }

    /// Initial `[b_2..b_S, n_1..n_S]` guess vector.
    pub fn bn_guess(&self) -> Vec<f64> {
        let s = self.periods;
        let mut guess = vec![self.savings_guess; s.saturating_sub(1)];
        guess.extend(std::iter::repeat(self.labor_guess).take(s));
        guess
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(cfg.crop.grid_size, CROP_GRID_SIZE);
        assert_eq!(cfg.olg.periods, OLG_PERIODS);
        assert_eq!(cfg.songs.csv, PathBuf::from(SONGS_CSV));
    }

    #[test]
    fn partial_section_overrides_only_named_keys() {
        let cfg = Config::from_toml_str(
            "[olg]\nperiods = 3\ndamping = 0.8\n",
            Path::new("partial.toml"),
        )
        .unwrap();
        assert_eq!(cfg.olg.periods, 3);
        assert_eq!(cfg.olg.damping, 0.8);
        assert_eq!(cfg.olg.alpha, OLG_ALPHA);
        assert_eq!(cfg.crop.beta, CROP_BETA);
    }

    #[test]
    fn bad_toml_reports_path() {
        let err = Config::from_toml_str("[olg\nperiods=", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"), "{err}");
    }

    #[test]
    fn bn_guess_layout() {
        let cfg = OlgConfig {
            periods: 3,
            ..OlgConfig::default()
        };
        assert_eq!(
            cfg.bn_guess(),
            vec![OLG_SAVINGS_GUESS, OLG_SAVINGS_GUESS, OLG_LABOR_GUESS, OLG_LABOR_GUESS, OLG_LABOR_GUESS]
        );
    }

    #[test]
    fn household_defaults_chi_to_ones() {
        let cfg = OlgConfig {
            periods: 4,
            ..OlgConfig::default()
        };
        let hh = cfg.household().unwrap();
        assert_eq!(hh.periods(), 4);
        assert!(hh.chi.iter().all(|&c| c == 1.0));
    }
}
