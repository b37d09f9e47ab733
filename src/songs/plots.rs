//! PNG renderings of song-table columns.

use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::stats::{auto_bins, gaussian_kde, histogram, linear_fit, unique_sorted};
use super::table::SongTable;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::plotting::{padded_range, plot_err, png_canvas, PlotStyle};

/// Evaluation points of the density curve.
const KDE_POINTS: usize = 200;

fn axis_range(values: &[f64], name: &str) -> Result<(f64, f64)> {
    padded_range(values.iter().copied())
        .ok_or_else(|| Error::EmptyData(format!("no finite values in {name}")))
}

fn paired<'a>(table: &'a SongTable, x: &str, y: &str) -> Result<(&'a [f64], &'a [f64])> {
    Ok((table.numeric(x)?, table.numeric(y)?))
}

/// Histogram of `column` with a kernel density curve scaled to counts.
pub fn distribution_plot(table: &SongTable, column: &str, path: &Path, style: PlotStyle) -> Result<()> {
    let values = table.numeric(column)?;
    let hist = histogram(values, auto_bins(values))?;
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];

    let xs: Vec<f64> = (0..KDE_POINTS)
        .map(|i| lo + (hi - lo) * i as f64 / (KDE_POINTS - 1) as f64)
        .collect();
    let scale = values.len() as f64 * hist.bin_width();
    let density: Vec<f64> = match gaussian_kde(values, &xs) {
        Ok(d) => d.into_iter().map(|v| v * scale).collect(),
        Err(_) => Vec::new(),
    };

    let max_count = hist.counts.iter().copied().max().unwrap_or(0) as f64;
    let y_hi = density.iter().copied().fold(max_count, f64::max) * 1.05;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Distribution of {column} among Popular Spotify Tracks"),
            ("sans-serif", 26),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0.0..y_hi.max(1.0))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Count")
        .light_line_style(WHITE)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], c as f64)],
                BLUE.mix(0.45).filled(),
            )
        }))
        .map_err(plot_err)?;
    if !density.is_empty() {
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(density.iter().copied()),
                BLUE.stroke_width(2),
            ))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn scatter_chart(
    table: &SongTable,
    x: &str,
    y: &str,
    path: &Path,
    style: PlotStyle,
    alpha: f64,
    with_fit: bool,
) -> Result<()> {
    let (xv, yv) = paired(table, x, y)?;
    let fit = if with_fit {
        Some(linear_fit(xv, yv)?)
    } else {
        None
    };
    let (x_lo, x_hi) = axis_range(xv, x)?;
    let (y_lo, y_hi) = axis_range(yv, y)?;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{y} and {x}"), ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc(x)
        .y_desc(y)
        .draw()
        .map_err(plot_err)?;
    chart
        .draw_series(
            xv.iter()
                .zip(yv)
                .map(|(&a, &b)| Circle::new((a, b), 3, BLUE.mix(alpha).filled())),
        )
        .map_err(plot_err)?;

    if let Some(fit) = fit {
        let line: Vec<(f64, f64)> = unique_sorted(xv)
            .into_iter()
            .map(|a| (a, fit.eval(a)))
            .collect();
        chart
            .draw_series(DashedLineSeries::new(line, 10, 6, BLACK.stroke_width(2)))
            .map_err(plot_err)?;
        info!(
            "{} ~ {}: slope {:.4}, intercept {:.4}",
            y, x, fit.slope, fit.intercept
        );
    }

    root.present().map_err(plot_err)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Translucent scatter of `y` against `x`.
pub fn scatter_plot(table: &SongTable, x: &str, y: &str, path: &Path, style: PlotStyle) -> Result<()> {
    scatter_chart(table, x, y, path, style, SCATTER_ALPHA, false)
}

/// Scatter of `y` against `x` with the least-squares line, dashed black,
/// drawn across the distinct x values.
pub fn scatter_fit_plot(table: &SongTable, x: &str, y: &str, path: &Path, style: PlotStyle) -> Result<()> {
    scatter_chart(table, x, y, path, style, 1.0, true)
}

/// 3-D scatter of `z` over the (`x`, `y`) plane.
///
/// plotters draws its second axis vertically, so `z` is mapped there and
/// `y` becomes the depth axis.
pub fn scatter_3d_plot(
    table: &SongTable,
    x: &str,
    y: &str,
    z: &str,
    path: &Path,
    style: PlotStyle,
) -> Result<()> {
    let (xv, yv) = paired(table, x, y)?;
    let zv = table.numeric(z)?;
    let (x_lo, x_hi) = axis_range(xv, x)?;
    let (y_lo, y_hi) = axis_range(yv, y)?;
    let (z_lo, z_hi) = axis_range(zv, z)?;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{z} and Relation to {x} with {y}"),
            ("sans-serif", 24),
        )
        .margin(20)
        .build_cartesian_3d(x_lo..x_hi, z_lo..z_hi, y_lo..y_hi)
        .map_err(plot_err)?;
    chart.with_projection(|mut pb| {
        pb.pitch = VIEW_ELEVATION_DEG.to_radians();
        pb.yaw = VIEW_AZIMUTH_DEG.to_radians();
        pb.scale = 0.8;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.1))
        .max_light_lines(3)
        .draw()
        .map_err(plot_err)?;
    chart
        .draw_series(
            xv.iter()
                .zip(yv)
                .zip(zv)
                .map(|((&a, &b), &c)| Circle::new((a, c, b), 3, RED.mix(SCATTER_3D_ALPHA).filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!("Wrote {} ({} = x, {} = depth, {} = height)", path.display(), x, y, z);
    Ok(())
}
