use std::path::Path;

use itertools::{Itertools, MinMaxResult};
use plotters::{chart::ChartState, coord::types::RangedCoordf64, coord::Shift, prelude::*};

use calval::{
    epoch::{decimal_years, trend_reference},
    pipeline::BiasSeries,
    prelude::Epoch,
};

use crate::Error;

pub type Plot2d = Cartesian2d<RangedCoordf64, RangedCoordf64>;

/// Plot dimensions
const DIMS: (u32, u32) = (1600, 1200);

/// Bias axis, in mm
const Y_RANGE: (f64, f64) = (-200.0, 300.0);

/// Year of the trend reference instant
const REFERENCE_YEAR: f64 = 2016.0;

fn plot_error<E: std::fmt::Display>(e: E) -> Error {
    Error::PlotError(e.to_string())
}

/*
 * Epoch as a fractional year, on the trend axis scale
 */
fn fractional_year(t: Epoch) -> f64 {
    REFERENCE_YEAR + decimal_years(t, trend_reference())
}

/// Builds plot area
pub fn build_plot(path: &Path, dims: (u32, u32)) -> Result<DrawingArea<BitMapBackend, Shift>, Error> {
    let area = BitMapBackend::new(path, dims).into_drawing_area();
    area.fill(&WHITE).map_err(plot_error)?;
    Ok(area)
}

/// Builds a chart
pub fn build_chart(
    title: &str,
    x_range: (f64, f64),
    y_range: (f64, f64),
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<ChartState<Plot2d>, Error> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 40).into_font())
        .margin(40)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc("Time")
        .x_labels(12)
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_desc("SSH Bias [mm]")
        .y_labels(11)
        .draw()
        .map_err(plot_error)?;
    Ok(chart.to_chart_state())
}

/*
 * Time axis covering all samples, padded so a single sample remains visible
 */
fn time_range(series: &BiasSeries) -> (f64, f64) {
    let years = series
        .inliers
        .epochs
        .iter()
        .chain(series.outliers.epochs.iter())
        .map(|t| fractional_year(*t));
    match years.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::MinMax(min, max) => {
            let pad = (max - min) * 0.02;
            (min - pad, max + pad)
        },
        MinMaxResult::OneElement(x) => (x - 0.5, x + 0.5),
        MinMaxResult::NoElements => (REFERENCE_YEAR, REFERENCE_YEAR + 1.0),
    }
}

/// Legend of the retained samples
pub fn inliers_label(series: &BiasSeries) -> String {
    format!(
        "Included Data ({}), σ={:.3} mm",
        series.inliers.len(),
        series.inlier_stddev
    )
}

/// Legend of the rejected samples
pub fn outliers_label(series: &BiasSeries) -> String {
    format!("3σ Outliers ({})", series.outliers.len())
}

/// Legend of the trend
pub fn trend_label(series: &BiasSeries) -> String {
    format!(
        "Linear Fit, R²={:.6}, b₁={:.3} mm/yr",
        series.trend.r_squared, series.trend.slope
    )
}

/// Renders given [BiasSeries]: retained samples, outliers and trend
pub fn plot_bias_series(path: &Path, series: &BiasSeries) -> Result<(), Error> {
    let area = build_plot(path, DIMS)?;
    let chart = build_chart(
        series.product.title(),
        time_range(series),
        Y_RANGE,
        &area,
    )?;
    let mut chart = chart.restore(&area);

    let inliers = series
        .inliers
        .iter()
        .map(|(t, value)| (fractional_year(t), value))
        .collect::<Vec<_>>();

    chart
        .draw_series(LineSeries::new(inliers.iter().copied(), GREEN.stroke_width(2)))
        .map_err(plot_error)?;
    chart
        .draw_series(
            inliers
                .iter()
                .map(|point| TriangleMarker::new(*point, 6, GREEN.filled())),
        )
        .map_err(plot_error)?
        .label(inliers_label(series))
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, GREEN.filled()));

    chart
        .draw_series(
            series
                .outliers
                .iter()
                .map(|(t, value)| TriangleMarker::new((fractional_year(t), value), 6, RED.filled())),
        )
        .map_err(plot_error)?
        .label(outliers_label(series))
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, RED.filled()));

    chart
        .draw_series(LineSeries::new(
            series
                .trend_series()
                .iter()
                .map(|(t, value)| (fractional_year(t), value)),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_error)?
        .label(trend_label(series))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(plot_error)?;

    area.present().map_err(plot_error)?;
    Ok(())
}
