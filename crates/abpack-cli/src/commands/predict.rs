use abpack_io::{write_prediction_table, PredictionRecord};
use abpack_model::{mae, mean_error, rmse, TrainedModel};
use std::path::Path;
use tracing::info;

pub fn execute(input: &Path, model: &Path, out: &Path) -> anyhow::Result<()> {
    let table = abpack_io::read_training_table(input)?;
    let trained = TrainedModel::load(model)?;

    let x = table.to_matrix();
    let predicted = trained.predict(table.schema().columns(), x.view())?.to_vec();

    let records: Vec<PredictionRecord> = table
        .codes()
        .iter()
        .zip(table.angles())
        .zip(&predicted)
        .map(|((code, &angle), &p)| PredictionRecord {
            code: code.clone(),
            angle,
            predicted: p,
            error: p - angle,
        })
        .collect();

    info!(
        rows = records.len(),
        rmse = rmse(table.angles(), &predicted),
        mae = mae(table.angles(), &predicted),
        mean_error = mean_error(table.angles(), &predicted),
        "evaluated predictions"
    );

    write_prediction_table(out, &records)?;
    info!(out = %out.display(), "wrote prediction table");
    Ok(())
}
