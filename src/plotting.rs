//! Shared plotters plumbing: canvas size, axis ranges, error conversion.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Output canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

pub(crate) fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Create parent directories and open a white PNG canvas at `path`.
pub(crate) fn png_canvas(path: &Path, style: PlotStyle) -> Result<DrawingArea<BitMapBackend<'_>, Shift>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
        }
    }
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    Ok(root)
}

/// `[min, max]` of finite values widened by 5% on each side.
/// A constant series gets a unit-width window around its value.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if hi == lo {
        return Some((lo - 0.5, hi + 0.5));
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

/// Check a plot call in tests: on success the file must be a PNG. A font
/// lookup failure is the only error that counts as a skip, since minimal
/// hosts may have no system fonts. Returns whether the plot was drawn.
#[cfg(test)]
pub(crate) fn assert_rendered(result: Result<()>, path: &Path) -> bool {
    match result {
        Ok(()) => {
            let bytes = std::fs::read(path)
                .unwrap_or_else(|e| panic!("{} not written: {e}", path.display()));
            assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
            true
        }
        Err(Error::Plot(msg)) if msg.to_lowercase().contains("font") => {
            println!("Skipping render check, no usable font: {msg}");
            false
        }
        Err(e) => panic!("plot failed: {e}"),
    }
}
