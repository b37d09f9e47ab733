//! Closed-form equations of the OLG model: firm first-order conditions,
//! aggregation, budget constraint and marginal utilities.
//!
//! Arguments outside an equation's domain are clamped to
//! [`DOMAIN_EPSILON`] instead of producing NaN.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Cobb-Douglas firm: `Y = A K^α L^(1−α)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirmParams {
    pub alpha: f64,
    pub delta: f64,
    /// Total factor productivity A.
    pub tfp: f64,
}

impl Default for FirmParams {
    fn default() -> Self {
        Self {
            alpha: OLG_ALPHA,
            delta: OLG_DELTA,
            tfp: OLG_TFP,
        }
    }
}

/// Aggregate labor supplied.
pub fn aggregate_labor(n: &[f64]) -> f64 {
    n.iter().sum()
}

/// Aggregate capital supplied.
pub fn aggregate_capital(b: &[f64]) -> f64 {
    b.iter().sum()
}

/// Interest rate from the firm's capital FOC: `r = α A (L/K)^(1−α) − δ`.
pub fn interest_rate(k: f64, l: f64, firm: &FirmParams) -> f64 {
    let k = k.max(DOMAIN_EPSILON);
    let l = l.max(DOMAIN_EPSILON);
    firm.alpha * firm.tfp * (l / k).powf(1.0 - firm.alpha) - firm.delta
}

/// Wage consistent with `r` through both firm FOCs:
/// `w = (1−α) A (α A / (r + δ))^(α/(1−α))`.
pub fn wage(r: f64, firm: &FirmParams) -> f64 {
    let alpha = firm.alpha;
    let rental = (r + firm.delta).max(DOMAIN_EPSILON);
    (1.0 - alpha) * firm.tfp * ((alpha * firm.tfp) / rental).powf(alpha / (1.0 - alpha))
}

/// Output `A K^α L^(1−α)`.
pub fn output(k: f64, l: f64, firm: &FirmParams) -> f64 {
    let k = k.max(DOMAIN_EPSILON);
    let l = l.max(DOMAIN_EPSILON);
    firm.tfp * k.powf(firm.alpha) * l.powf(1.0 - firm.alpha)
}

/// Budget constraint: `c = (1 + r) b_s + w n − b_{s+1}`.
#[inline]
pub fn consumption(r: f64, w: f64, b_s: f64, b_sp1: f64, n: f64) -> f64 {
    (1.0 + r) * b_s + w * n - b_sp1
}

/// Marginal utility of consumption `c^(−σ)`.
#[inline]
pub fn marginal_utility_consumption(c: f64, sigma: f64) -> f64 {
    c.max(DOMAIN_EPSILON).powf(-sigma)
}

/// Marginal disutility of labor under elliptical utility:
/// `χ (b/l̃) (n/l̃)^(υ−1) (1 − (n/l̃)^υ)^((1−υ)/υ)`.
///
/// `n` is kept strictly inside `(0, l̃)`, where the expression is finite.
#[inline]
pub fn marginal_disutility_labor(n: f64, chi: f64, b: f64, endowment: f64, upsilon: f64) -> f64 {
    let n = n.max(DOMAIN_EPSILON).min(endowment - DOMAIN_EPSILON);
    let share = n / endowment;
    chi * (b / endowment)
        * share.powf(upsilon - 1.0)
        * (1.0 - share.powf(upsilon)).powf((1.0 - upsilon) / upsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_are_sums() {
        assert_eq!(aggregate_labor(&[0.5, 0.25, 0.25]), 1.0);
        assert_eq!(aggregate_capital(&[]), 0.0);
    }

    #[test]
    fn wage_inverts_interest_rate() {
        let firm = FirmParams::default();
        let (k, l) = (3.0, 2.0);
        let r = interest_rate(k, l, &firm);
        // w from r must equal the marginal product of labor at K/L.
        let mpl = (1.0 - firm.alpha) * firm.tfp * (k / l).powf(firm.alpha);
        assert!((wage(r, &firm) - mpl).abs() < 1e-12);
    }

    #[test]
    fn interest_rate_uses_tfp() {
        let lo = FirmParams { tfp: 1.0, ..FirmParams::default() };
        let hi = FirmParams { tfp: 2.0, ..FirmParams::default() };
        let r_lo = interest_rate(1.0, 1.0, &lo);
        let r_hi = interest_rate(1.0, 1.0, &hi);
        assert!((r_lo - (0.3 - 0.1)).abs() < 1e-12);
        assert!((r_hi - (0.6 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn zero_profit_identity() {
        let firm = FirmParams::default();
        let (k, l) = (2.5, 1.7);
        let r = interest_rate(k, l, &firm);
        let w = wage(r, &firm);
        let y = output(k, l, &firm);
        assert!((y - (r + firm.delta) * k - w * l).abs() < 1e-12);
    }

    #[test]
    fn domain_guards_keep_values_finite() {
        let firm = FirmParams::default();
        assert!(interest_rate(-1.0, 1.0, &firm).is_finite());
        assert!(wage(-firm.delta - 1.0, &firm).is_finite());
        assert!(marginal_utility_consumption(-3.0, 1.5).is_finite());
        assert!(marginal_disutility_labor(1.5, 1.0, 0.501, 1.0, 1.554).is_finite());
        assert!(marginal_disutility_labor(-0.2, 1.0, 0.501, 1.0, 1.554).is_finite());
    }

    #[test]
    fn budget_constraint() {
        assert!((consumption(0.05, 1.2, 2.0, 0.5, 0.8) - (2.1 + 0.96 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn marginal_disutility_increases_in_labor() {
        let mut prev = 0.0;
        for k in 1..10 {
            let n = k as f64 / 10.0;
            let m = marginal_disutility_labor(n, 1.0, 0.501, 1.0, 1.554);
            assert!(m > prev);
            prev = m;
        }
    }
}
