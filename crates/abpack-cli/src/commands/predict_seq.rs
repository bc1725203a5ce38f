use abpack_core::{build_complete_row, extract, ExtractOptions, FeatureSchema};
use abpack_io::read_seq_file;
use abpack_model::TrainedModel;
use ndarray::Array2;
use std::path::Path;
use tracing::{debug, info};

/// Predicts the packing angle for one sequence file. The feature schema is
/// rebuilt from the model artifact, so the sequence only has to cover the
/// positions the model was fitted on.
pub fn execute(seq: &Path, model: &Path) -> anyhow::Result<()> {
    let trained = TrainedModel::load(model)?;
    let schema = FeatureSchema::from_columns(trained.columns())?;

    let (code, records) = read_seq_file(seq)?;
    let options = ExtractOptions::new(schema.positions().clone()).with_loops(schema.with_loops());
    let (entity, report) = extract(&code, &records, &options);
    debug!(
        records = report.records,
        kept = report.kept,
        unknown = report.unknown_residues,
        "extracted sequence"
    );

    let row = build_complete_row(&entity, &schema)?;
    let x = Array2::from_shape_vec((1, row.len()), row)?;
    let predicted = trained.predict(schema.columns(), x.view())?;

    info!(code = code.as_str(), angle = predicted[0], "predicted packing angle");
    println!("{code} {:.2}", predicted[0]);
    Ok(())
}
