//! Summary statistics over the aggregate dataset.

use crate::error::{PipelineError, Result};
use crate::models::{AggregateDataset, StatisticsReport};

/// Compute total, mean, median and sample standard deviation.
///
/// `file_count` is carried into the report unchanged. Fails with
/// [`PipelineError::EmptyDataset`] when the dataset has no points.
pub fn compute_statistics(dataset: &AggregateDataset, file_count: usize) -> Result<StatisticsReport> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }
    let values = dataset.values();

    let total = sum(values);
    let mean = total / values.len() as f64;

    Ok(StatisticsReport {
        total,
        mean,
        median: median(values),
        stdev: sample_stdev(values, mean),
        file_count,
        point_count: values.len(),
    })
}

/// Sum in insertion order.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Median of a sorted copy; the input is left untouched.
///
/// Returns `NaN` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (Bessel's correction); 0 for fewer than two points.
pub fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (squared / (values.len() - 1) as f64).sqrt()
}
