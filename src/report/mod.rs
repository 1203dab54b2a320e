//! Report output: the CSV/JSON statistics report and the histogram image.

pub mod chart;
pub mod generator;

pub use chart::render_histogram;
pub use generator::*;
