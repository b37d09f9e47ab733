//! Life-cycle profiles of a solved steady state.

use std::path::Path;

use plotters::prelude::*;

use super::steady_state::SteadyState;
use crate::error::{Error, Result};
use crate::plotting::{padded_range, plot_err, png_canvas, PlotStyle};

/// Consumption, savings and labor supply by age on one chart.
///
/// Savings b_{s+1} are plotted at the age s at which they are chosen; the
/// final period saves nothing.
pub fn lifecycle_plot(ss: &SteadyState, path: &Path, style: PlotStyle) -> Result<()> {
    let periods = ss.consumption.len();
    if periods == 0 {
        return Err(Error::EmptyData("steady state has no periods".into()));
    }
    let savings: Vec<f64> = ss
        .savings()
        .into_iter()
        .chain(std::iter::once(0.0))
        .collect();
    let labor = ss.labor_supply();

    let series: [(&str, &[f64], RGBColor); 3] = [
        ("Consumption", &ss.consumption, BLUE),
        ("Savings", &savings, RED),
        ("Labor supply", &labor, GREEN),
    ];

    let (y_lo, y_hi) = padded_range(series.iter().flat_map(|(_, v, _)| v.iter().copied()))
        .ok_or_else(|| Error::EmptyData("no finite life-cycle values".into()))?;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Steady-state life cycle (r = {:.4}, w = {:.4})", ss.r, ss.w),
            ("sans-serif", 26),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(1.0..periods as f64, y_lo..y_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Age s")
        .y_desc("Level")
        .draw()
        .map_err(plot_err)?;

    for (label, values, color) in series {
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(s, &v)| ((s + 1) as f64, v)),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}
