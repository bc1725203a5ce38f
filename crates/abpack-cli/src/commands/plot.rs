use abpack_io::read_prediction_table;
use abpack_model::{mae, rmse};
use abpack_plot::{error_histogram, save, scatter_actual_predicted};
use std::path::Path;
use tracing::info;

pub const SCATTER_FILE: &str = "predicted_vs_actual.svg";
pub const HISTOGRAM_FILE: &str = "error_distribution.svg";

pub fn execute(input: &Path, out_dir: &Path, bins: usize) -> anyhow::Result<()> {
    let records = read_prediction_table(input)?;
    std::fs::create_dir_all(out_dir)?;

    let pairs: Vec<(f64, f64)> = records.iter().map(|r| (r.angle, r.predicted)).collect();
    let errors: Vec<f64> = records.iter().map(|r| r.error).collect();
    let (actual, predicted): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();

    let scatter = out_dir.join(SCATTER_FILE);
    save(
        &scatter_actual_predicted(&pairs, "Predicted vs measured packing angle"),
        &scatter,
    )?;
    let histogram = out_dir.join(HISTOGRAM_FILE);
    save(
        &error_histogram(&errors, bins, "Prediction error distribution"),
        &histogram,
    )?;

    info!(
        rows = records.len(),
        rmse = rmse(&actual, &predicted),
        mae = mae(&actual, &predicted),
        scatter = %scatter.display(),
        histogram = %histogram.display(),
        "wrote charts"
    );
    Ok(())
}
