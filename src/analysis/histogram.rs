//! Fixed-width histogram binning.

/// Default number of bins.
pub const DEFAULT_BINS: usize = 20;

/// Equal-width bins spanning the range of a dataset.
///
/// The last bin is closed on the right so the maximum is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub lower: f64,
    /// Right edge of the last bin.
    pub upper: f64,
    /// Count per bin, left to right.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins over their range.
    ///
    /// A constant dataset gets a unit-wide range centred on its value.
    /// Returns `None` for an empty dataset or zero bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let (lower, upper) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0usize; bins];

        for &v in values {
            let index = (((v - lower) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        Some(Self {
            lower,
            upper,
            counts,
        })
    }

    /// Width of every bin.
    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// Largest bin count.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Iterate `(left_edge, right_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let width = self.bin_width();
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let left = self.lower + width * i as f64;
            (left, left + width, count)
        })
    }
}
