//! Histogram image rendering.
//!
//! Bars are drawn with plotters' bitmap backend. The build carries no font
//! backend, so the image holds bars and axis lines but no text.

use super::generator::parent_dir;
use crate::analysis::Histogram;
use crate::error::{PipelineError, Result};
use plotters::prelude::*;
use std::path::Path;

const BAR_FILL: RGBColor = RGBColor(135, 206, 235);

/// Render `histogram` as a PNG at `path`.
///
/// The image is drawn into a temporary `.png` next to the target and renamed
/// into place once complete.
pub fn render_histogram(histogram: &Histogram, path: &Path, size: (u32, u32)) -> Result<()> {
    let tmp = tempfile::Builder::new()
        .prefix(".histogram")
        .suffix(".png")
        .tempfile_in(parent_dir(path))
        .map_err(|e| PipelineError::write_failure(path, e))?;

    draw_histogram(histogram, tmp.path(), size)
        .map_err(|e| PipelineError::write_failure(path, e))?;

    tmp.persist(path)
        .map_err(|e| PipelineError::write_failure(path, e.error))?;

    Ok(())
}

fn draw_histogram(
    histogram: &Histogram,
    target: &Path,
    size: (u32, u32),
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(target, size).into_drawing_area();
    root.fill(&WHITE)?;

    // Headroom above the tallest bar.
    let y_top = (histogram.max_count() as f64 * 1.05).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(histogram.lower..histogram.upper, 0.0..y_top)?;

    chart.draw_series(histogram.bins().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], BAR_FILL.filled())
    }))?;

    chart.draw_series(
        histogram
            .bins()
            .filter(|&(_, _, count)| count > 0)
            .map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
            }),
    )?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (histogram.lower, y_top),
            (histogram.lower, 0.0),
            (histogram.upper, 0.0),
        ],
        BLACK.stroke_width(1),
    )))?;

    root.present()?;
    Ok(())
}
