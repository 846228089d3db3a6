//! Overlay plots of raw and resampled series.
//!
//! Each figure has one panel per measurement column, with the raw series in grey
//! and the resampled series in red drawn against the key column.
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::resample::ResampleOutcome;
use crate::table::SeriesTable;
use crate::text::{with_suffix, OutputError};

const RAW_COLOR: RGBColor = RGBColor(128, 128, 128);
const RESAMPLED_COLOR: RGBColor = RGBColor(178, 34, 34);
const PANEL_SIZE: (u32, u32) = (800, 450);

/// The scale of a plot's value axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    /// Logarithmic, non-positive values are left out
    Log,
}

/// The `(key, value)` pairs of `column` where both are present, sorted by key.
pub fn series_points(
    table: &SeriesTable,
    key: &str,
    column: &str,
    scale: AxisScale,
) -> Vec<(f64, f64)> {
    let (Some(keys), Some(values)) = (table.column(key), table.column(column)) else {
        return Vec::new();
    };
    let mut points: Vec<(f64, f64)> = keys
        .iter()
        .zip(values.iter())
        .filter_map(|(k, v)| Some(((*k)?, (*v)?)))
        .filter(|(_, v)| scale == AxisScale::Linear || *v > 0.0)
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

fn padded(min: f64, max: f64, scale: AxisScale) -> (f64, f64) {
    if min < max {
        (min, max)
    } else {
        match scale {
            AxisScale::Linear => (min - 0.5, max + 0.5),
            AxisScale::Log => (min * 0.5, max * 2.0),
        }
    }
}

/// The x and y extents covering every point, widened when they collapse to a point.
pub fn bounds<'a, I>(points: I, scale: AxisScale) -> Option<((f64, f64), (f64, f64))>
where
    I: IntoIterator<Item = &'a (f64, f64)>,
{
    let ((xmin, xmax), (ymin, ymax)) = points.into_iter().fold(None, |acc, (x, y)| {
        let ((xmin, xmax), (ymin, ymax)) = acc.unwrap_or(((*x, *x), (*y, *y)));
        Some(((xmin.min(*x), xmax.max(*x)), (ymin.min(*y), ymax.max(*y))))
    })?;
    Some((
        padded(xmin, xmax, AxisScale::Linear),
        padded(ymin, ymax, scale),
    ))
}

macro_rules! draw_panel {
    ($panel:expr, $key:expr, $column:expr, $x:expr, $y:expr, $raw:expr, $resampled:expr) => {{
        let mut chart = ChartBuilder::on($panel)
            .caption($column, ("sans-serif", 18).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d($x, $y)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc($key)
            .y_desc($column)
            .axis_desc_style(("sans-serif", 14).into_font())
            .draw()?;

        chart
            .draw_series(LineSeries::new($raw, &RAW_COLOR))?
            .label(format!("{}: Raw", $column))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RAW_COLOR));
        chart
            .draw_series(LineSeries::new($resampled, &RESAMPLED_COLOR))?
            .label(format!("{}: Resampled", $column))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RESAMPLED_COLOR));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }};
}

/// Draw every non-key column of `resampled` over the same column of `raw` into an SVG at `path`.
pub fn draw_overlay_svg<P>(
    raw: &SeriesTable,
    resampled: &SeriesTable,
    key: &str,
    path: P,
    scale: AxisScale,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: AsRef<Path>,
{
    let columns: Vec<&str> = resampled
        .names()
        .iter()
        .map(|n| n.as_str())
        .filter(|n| *n != key)
        .collect();
    if columns.is_empty() {
        return Ok(());
    }
    let size = (PANEL_SIZE.0, PANEL_SIZE.1 * columns.len() as u32);
    let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((columns.len(), 1));

    for (panel, column) in panels.iter().zip(columns) {
        let raw_points = series_points(raw, key, column, scale);
        let resampled_points = series_points(resampled, key, column, scale);
        let Some(((xmin, xmax), (ymin, ymax))) =
            bounds(raw_points.iter().chain(resampled_points.iter()), scale)
        else {
            continue;
        };
        match scale {
            AxisScale::Linear => draw_panel!(
                panel,
                key,
                column,
                xmin..xmax,
                ymin..ymax,
                raw_points,
                resampled_points
            ),
            AxisScale::Log => draw_panel!(
                panel,
                key,
                column,
                xmin..xmax,
                (ymin..ymax).log_scale(),
                raw_points,
                resampled_points
            ),
        }
    }
    root.present()?;
    Ok(())
}

/// Write the linear (`<stem>.svg`) and log scale (`<stem>_log.svg`) figures for one outcome
pub fn write_output_plots(
    raw: &SeriesTable,
    outcome: &ResampleOutcome,
    stem: &Path,
) -> Result<Vec<PathBuf>, OutputError> {
    let mut written = Vec::with_capacity(2);
    for (suffix, scale) in [("_log.svg", AxisScale::Log), (".svg", AxisScale::Linear)] {
        let path = with_suffix(stem, suffix);
        draw_overlay_svg(raw, &outcome.table, &outcome.key, &path, scale)
            .map_err(|e| OutputError::Plot(e.to_string()))?;
        written.push(path);
    }
    Ok(written)
}
