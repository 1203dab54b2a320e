//! Aggregation of parsed files.
//!
//! Values are concatenated in file-then-line order with no deduplication,
//! reordering or filtering.

use crate::models::{AggregateDataset, ParsedFile};

/// Concatenate the values of every parsed file, in input order.
pub fn aggregate(files: &[ParsedFile]) -> AggregateDataset {
    let capacity = files.iter().map(ParsedFile::point_count).sum();
    let mut values = Vec::with_capacity(capacity);

    for file in files {
        values.extend_from_slice(&file.values);
    }

    AggregateDataset::new(values)
}
