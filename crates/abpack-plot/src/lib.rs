//! # abpack-plot
//!
//! SVG rendering of prediction run results.

pub mod charts;

pub use self::charts::{error_histogram, save, scatter_actual_predicted};
