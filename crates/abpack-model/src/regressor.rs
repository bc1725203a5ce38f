//! The fitting interface the pipeline trains and predicts through.

use ndarray::{Array1, ArrayView1, ArrayView2};

/// A regressor from feature rows to packing angles. One row per entity,
/// columns in the feature schema's order.
pub trait AngleRegressor {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> anyhow::Result<()>;

    fn predict(&self, x: ArrayView2<f64>) -> anyhow::Result<Array1<f64>>;
}
