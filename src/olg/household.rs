//! Household first-order conditions for an S-period life cycle.
//!
//! Unknowns are packed as `bn = [b_2, …, b_S, n_1, …, n_S]` (length 2S − 1).
//! Agents are born and die with zero assets, so
//!
//! ```text
//! b_s     = [0,   b_2, …, b_S]
//! b_{s+1} = [b_2, …, b_S, 0  ]
//! ```
//!
//! The residual vector stacks S − 1 intertemporal Euler errors followed by
//! S intratemporal (labor) Euler errors.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::equations::{consumption, marginal_disutility_labor, marginal_utility_consumption};
use crate::error::{Error, Result};

/// Preferences of a household living S periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdParams {
    /// Relative risk aversion σ.
    pub sigma: f64,
    /// Labor disutility weight per age; its length fixes S.
    pub chi: Vec<f64>,
    /// Time endowment l̃.
    pub time_endowment: f64,
    /// Elliptical utility shape υ.
    pub upsilon: f64,
    /// Elliptical utility scale b.
    pub ellipse_b: f64,
    /// Discount factor β.
    pub beta: f64,
}

impl HouseholdParams {
    pub fn new(
        sigma: f64,
        chi: Vec<f64>,
        time_endowment: f64,
        upsilon: f64,
        ellipse_b: f64,
        beta: f64,
    ) -> Result<Self> {
        if chi.len() < 2 {
            return Err(Error::DimensionMismatch {
                what: "life-cycle periods (need at least 2)",
                expected: 2,
                actual: chi.len(),
            });
        }
        Ok(Self {
            sigma,
            chi,
            time_endowment,
            upsilon,
            ellipse_b,
            beta,
        })
    }

    /// Number of periods S.
    pub fn periods(&self) -> usize {
        self.chi.len()
    }

    /// Length of the packed unknown vector, 2S − 1.
    pub fn unknowns(&self) -> usize {
        2 * self.periods() - 1
    }
}

/// View of a packed `bn` vector as savings and labor paths.
pub struct LifeCycle<'a> {
    /// `b_2..b_S`.
    pub savings: &'a [f64],
    /// `n_1..n_S`.
    pub labor: &'a [f64],
}

impl<'a> LifeCycle<'a> {
    pub fn split(bn: &'a [f64], periods: usize) -> Result<Self> {
        let expected = 2 * periods - 1;
        if bn.len() != expected {
            return Err(Error::DimensionMismatch {
                what: "household unknowns (2S - 1)",
                expected,
                actual: bn.len(),
            });
        }
        let (savings, labor) = bn.split_at(periods - 1);
        Ok(Self { savings, labor })
    }

    /// Assets held entering age s, s = 1..S (first entry 0).
    pub fn assets_in(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(0.0).chain(self.savings.iter().copied())
    }

    /// Assets carried out of age s, s = 1..S (last entry 0).
    pub fn assets_out(&self) -> impl Iterator<Item = f64> + '_ {
        self.savings.iter().copied().chain(std::iter::once(0.0))
    }

    /// Consumption path c_1..c_S.
    pub fn consumption(&self, r: f64, w: f64) -> Vec<f64> {
        self.assets_in()
            .zip(self.assets_out())
            .zip(self.labor.iter())
            .map(|((b_s, b_sp1), &n)| consumption(r, w, b_s, b_sp1, n))
            .collect()
    }
}

/// Stacked Euler errors of the household problem at prices (r, w).
pub fn household_foc(bn: &[f64], r: f64, w: f64, hh: &HouseholdParams) -> Result<Array1<f64>> {
    let s = hh.periods();
    let path = LifeCycle::split(bn, s)?;
    let c = path.consumption(r, w);
    let mu_c: Vec<f64> = c
        .iter()
        .map(|&c_s| marginal_utility_consumption(c_s, hh.sigma))
        .collect();

    let mut errors = Array1::zeros(2 * s - 1);
    for i in 0..s - 1 {
        errors[i] = mu_c[i] - hh.beta * (1.0 + r) * mu_c[i + 1];
    }
    for j in 0..s {
        let mu_n = marginal_disutility_labor(
            path.labor[j],
            hh.chi[j],
            hh.ellipse_b,
            hh.time_endowment,
            hh.upsilon,
        );
        errors[s - 1 + j] = w * mu_c[j] - mu_n;
    }
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(s: usize) -> HouseholdParams {
        HouseholdParams::new(1.5, vec![1.0; s], 1.0, 1.554, 0.501, 0.96).unwrap()
    }

    #[test]
    fn split_layout() {
        let bn = [0.1, 0.2, 0.7, 0.8, 0.9];
        let lc = LifeCycle::split(&bn, 3).unwrap();
        assert_eq!(lc.savings, &[0.1, 0.2]);
        assert_eq!(lc.labor, &[0.7, 0.8, 0.9]);
        assert_eq!(lc.assets_in().collect::<Vec<_>>(), vec![0.0, 0.1, 0.2]);
        assert_eq!(lc.assets_out().collect::<Vec<_>>(), vec![0.1, 0.2, 0.0]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = household_foc(&[0.1, 0.5, 0.5], 0.05, 1.0, &params(3)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 5, actual: 3, .. }));
    }

    #[test]
    fn single_period_life_is_rejected() {
        assert!(HouseholdParams::new(1.5, vec![1.0], 1.0, 1.554, 0.501, 0.96).is_err());
    }

    #[test]
    fn residual_length_and_consumption_path() {
        let hh = params(3);
        let bn = [0.1, 0.2, 0.7, 0.8, 0.9];
        let (r, w) = (0.05, 1.0);
        let e = household_foc(&bn, r, w, &hh).unwrap();
        assert_eq!(e.len(), 5);

        let c = LifeCycle::split(&bn, 3).unwrap().consumption(r, w);
        assert!((c[0] - (0.7 - 0.1)).abs() < 1e-12);
        assert!((c[1] - (1.05 * 0.1 + 0.8 - 0.2)).abs() < 1e-12);
        assert!((c[2] - (1.05 * 0.2 + 0.9)).abs() < 1e-12);

        let mu = |c: f64| c.powf(-1.5);
        let expected0 = mu(c[0]) - 0.96 * 1.05 * mu(c[1]);
        assert!((e[0] - expected0).abs() < 1e-12);
    }

    #[test]
    fn flat_path_with_offsetting_rate_has_zero_savings_error() {
        // β(1 + r) = 1 and equal consumption make every intertemporal error vanish.
        let hh = params(3);
        let r = 1.0 / hh.beta - 1.0;
        let w = 1.0;
        // Zero savings and equal labor give equal consumption.
        let bn = [0.0, 0.0, 0.6, 0.6, 0.6];
        let e = household_foc(&bn, r, w, &hh).unwrap();
        assert!(e[0].abs() < 1e-12 && e[1].abs() < 1e-12, "{e:?}");
    }
}
