//! Histogram binning, kernel density and least-squares line.

use std::f64::consts::PI;

use serde::Serialize;

use super::table::summarize;
use crate::error::{Error, Result};

/// Equal-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// `y = slope x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Bin count: max of Sturges' rule and Freedman-Diaconis, with the
/// Freedman-Diaconis count capped at the sample size.
pub fn auto_bins(values: &[f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 1;
    }
    let sturges = ((n as f64).log2().ceil() as usize) + 1;
    let Some(s) = summarize(values) else {
        return sturges;
    };
    let iqr = s.q75 - s.q25;
    let range = s.max - s.min;
    if iqr <= 0.0 || range <= 0.0 {
        return sturges;
    }
    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let fd = (range / fd_width).ceil().min(n as f64) as usize;
    sturges.max(fd)
}

/// Count `values` into `bins` equal-width bins; the last bin includes `max`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if values.is_empty() {
        return Err(Error::EmptyData("histogram of an empty sample".into()));
    }
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Ok(Histogram { edges, counts })
}

/// Gaussian kernel density estimate at `points`, Scott bandwidth.
pub fn gaussian_kde(values: &[f64], points: &[f64]) -> Result<Vec<f64>> {
    let s = summarize(values).ok_or_else(|| Error::EmptyData("KDE of an empty sample".into()))?;
    let n = values.len() as f64;
    if s.std.is_nan() || s.std <= 0.0 {
        return Err(Error::EmptyData("KDE needs a sample with positive spread".into()));
    }
    let h = s.std * n.powf(-0.2);
    let norm = 1.0 / (n * h * (2.0 * PI).sqrt());
    Ok(points
        .iter()
        .map(|&x| {
            norm * values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
        })
        .collect())
}

/// Ordinary least squares line through `(x, y)`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            what: "fit y values",
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(Error::DegenerateFit(format!("{} point(s)", x.len())));
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
            (sxy + (xi - mx) * (yi - my), sxx + (xi - mx).powi(2))
        });
    if sxx == 0.0 {
        return Err(Error::DegenerateFit("x is constant".into()));
    }
    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}

/// Sorted distinct values.
pub fn unique_sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_closes_last_bin() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.edges.len(), 5);
        assert!((h.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_sample_gets_one_filled_bin() {
        let h = histogram(&[7.0; 4], 3).unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn auto_bins_small_sample_uses_sturges() {
        // n = 8: Sturges = 4; IQR = 3.5, FD width = 3.5, range 7 → 2.
        let v: Vec<f64> = (0..8).map(f64::from).collect();
        assert_eq!(auto_bins(&v), 4);
        assert_eq!(auto_bins(&[1.0]), 1);
    }

    #[test]
    fn auto_bins_with_far_outlier_is_capped() {
        // Tight bulk and one huge value: FD width is tiny next to the range.
        let mut v: Vec<f64> = (0..1000).map(|i| i as f64 * 1e-9).collect();
        v.push(1e12);
        let bins = auto_bins(&v);
        assert_eq!(bins, v.len());

        let h = histogram(&v, bins).unwrap();
        assert_eq!(h.counts.len(), bins);
        assert_eq!(h.counts.iter().sum::<usize>(), v.len());
        assert_eq!(h.counts[bins - 1], 1);
    }

    #[test]
    fn kde_integrates_to_one() {
        let v = [1.0, 2.0, 2.5, 4.0, 5.0];
        let grid: Vec<f64> = (0..=2000).map(|i| -10.0 + i as f64 * 0.01).collect();
        let d = gaussian_kde(&v, &grid).unwrap();
        let area: f64 = d.iter().sum::<f64>() * 0.01;
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn kde_rejects_constant_sample() {
        assert!(gaussian_kde(&[1.0, 1.0], &[1.0]).is_err());
    }

    #[test]
    fn fit_recovers_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let fit = linear_fit(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept + 1.0).abs() < 1e-12);
        assert!((fit.eval(10.0) - 19.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_fits() {
        assert!(matches!(linear_fit(&[1.0], &[2.0]), Err(Error::DegenerateFit(_))));
        assert!(matches!(
            linear_fit(&[3.0, 3.0], &[1.0, 2.0]),
            Err(Error::DegenerateFit(_))
        ));
    }

    #[test]
    fn unique_sorted_dedups() {
        assert_eq!(unique_sorted(&[3.0, 1.0, 3.0, 2.0, 1.0]), vec![1.0, 2.0, 3.0]);
    }
}
