//! PNG plots of the crop-problem solution.

use std::path::Path;

use ndarray::Array1;
use plotters::prelude::*;

use super::iteration::VfiSolution;
use crate::error::{Error, Result};
use crate::plotting::{padded_range, plot_err, png_canvas, PlotStyle};

/// Scatter of V(q) against q, skipping the lowest grid point.
///
/// At the lowest crop every choice is clamped to the sales floor, which puts
/// V far below the rest of the curve and flattens the plot.
pub fn value_function_plot(
    grid: &Array1<f64>,
    solution: &VfiSolution,
    path: &Path,
    style: PlotStyle,
) -> Result<()> {
    let points: Vec<(f64, f64)> = grid
        .iter()
        .zip(solution.value.iter())
        .skip(1)
        .map(|(&q, &v)| (q, v))
        .collect();
    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0))
        .ok_or_else(|| Error::EmptyData("value function has fewer than two points".into()))?;
    let (y_lo, y_hi) = padded_range(points.iter().map(|p| p.1))
        .ok_or_else(|| Error::EmptyData("value function has no finite values".into()))?;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Value Function - deterministic sales of crop", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Size of Crop")
        .y_desc("Value Function")
        .draw()
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, 3, BLUE.filled())),
        )
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Sales and leftover policies against crop size.
pub fn policy_plot(
    grid: &Array1<f64>,
    solution: &VfiSolution,
    path: &Path,
    style: PlotStyle,
) -> Result<()> {
    let (x_lo, x_hi) = padded_range(grid.iter().copied())
        .ok_or_else(|| Error::EmptyData("empty grid".into()))?;
    let (y_lo, y_hi) = padded_range(
        solution
            .sales
            .iter()
            .chain(solution.leftover.iter())
            .copied(),
    )
    .ok_or_else(|| Error::EmptyData("empty policy".into()))?;

    let root = png_canvas(path, style)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Policy Functions - deterministic sales of crop", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Size of Crop")
        .y_desc("Optimal choice")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            grid.iter().zip(solution.sales.iter()).map(|(&q, &s)| (q, s)),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Sales")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(
            grid.iter().zip(solution.leftover.iter()).map(|(&q, &l)| (q, l)),
            RED.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Leftover crop")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::assert_rendered;
    use crate::vfi::{solve, CropModel, CropParams, VfiSettings};

    #[test]
    fn writes_value_and_policy_pngs() {
        let model = CropModel::new(CropParams {
            grid_size: 31,
            ..CropParams::default()
        });
        let solution = solve(&model, &VfiSettings::default());
        let dir = tempfile::tempdir().unwrap();
        let style = PlotStyle {
            width: 320,
            height: 240,
        };
        for (name, result) in [
            ("value.png", value_function_plot(&model.grid, &solution, &dir.path().join("value.png"), style)),
            ("policy.png", policy_plot(&model.grid, &solution, &dir.path().join("policy.png"), style)),
        ] {
            assert_rendered(result, &dir.path().join(name));
        }
    }

    #[test]
    fn single_point_grid_has_nothing_to_plot() {
        let model = CropModel::new(CropParams {
            grid_size: 1,
            ..CropParams::default()
        });
        let solution = solve(&model, &VfiSettings::default());
        let dir = tempfile::tempdir().unwrap();
        let err = value_function_plot(&model.grid, &solution, &dir.path().join("v.png"), PlotStyle::default())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyData(_)));
    }
}
