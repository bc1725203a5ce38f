use abpack_core::{build_features, join_labels, reduce, ExtractOptions, FeatureSchema, TrainingTable};
use abpack_io::{
    compile_angles, read_entity_residues, write_angle_table, write_prediction_table,
    write_residue_table, write_training_table, PredictionRecord,
};
use abpack_model::{mae, mean_error, rmse, train_model, MlpConfig};
use abpack_plot::{error_histogram, save, scatter_actual_predicted};
use anyhow::bail;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct RunArgs {
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
    pub out_dir: PathBuf,
    pub positions: Option<PathBuf>,
    pub loops: bool,
    pub tool: String,
    pub config: MlpConfig,
}

/// The whole pipeline in one go: extract and measure both directories,
/// encode, reduce the training side, fit, then evaluate on the test side
/// and write tables, model and charts into the output directory.
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)?;
    let set = super::position_set(args.positions.as_deref())?;
    let options = ExtractOptions::new(set.clone()).with_loops(args.loops);
    let schema = FeatureSchema::new(set, args.loops);

    let train_table = prepare(&args.train_dir, "train", &args, &options, &schema)?;
    let (train_table, nr) = reduce(&train_table);
    info!(
        kept = nr.kept,
        removed = nr.removed,
        "reduced training redundancy"
    );
    write_training_table(&args.out_dir.join("train.csv"), &train_table)?;

    let trained = train_model(&train_table, args.config.clone())?;
    let model_path = args.out_dir.join("model.safetensors");
    trained.save(&model_path)?;
    info!(model = %model_path.display(), "saved model");

    let test_table = prepare(&args.test_dir, "test", &args, &options, &schema)?;
    write_training_table(&args.out_dir.join("test.csv"), &test_table)?;
    if test_table.is_empty() {
        bail!("no labelled test structures to evaluate");
    }

    let x = test_table.to_matrix();
    let predicted = trained.predict(schema.columns(), x.view())?.to_vec();
    let records: Vec<PredictionRecord> = test_table
        .codes()
        .iter()
        .zip(test_table.angles())
        .zip(&predicted)
        .map(|((code, &angle), &p)| PredictionRecord {
            code: code.clone(),
            angle,
            predicted: p,
            error: p - angle,
        })
        .collect();
    write_prediction_table(&args.out_dir.join("predictions.csv"), &records)?;
    info!(
        rows = records.len(),
        rmse = rmse(test_table.angles(), &predicted),
        mae = mae(test_table.angles(), &predicted),
        mean_error = mean_error(test_table.angles(), &predicted),
        "test evaluation"
    );

    let pairs: Vec<(f64, f64)> = records.iter().map(|r| (r.angle, r.predicted)).collect();
    let errors: Vec<f64> = records.iter().map(|r| r.error).collect();
    save(
        &scatter_actual_predicted(&pairs, "Predicted vs measured packing angle"),
        &args.out_dir.join(super::plot::SCATTER_FILE),
    )?;
    save(
        &error_histogram(&errors, 12, "Prediction error distribution"),
        &args.out_dir.join(super::plot::HISTOGRAM_FILE),
    )?;
    info!(out_dir = %args.out_dir.display(), "run complete");
    Ok(())
}

/// One directory through extraction, measurement and encoding. Writes the
/// intermediate tables next to the final outputs.
fn prepare(
    dir: &Path,
    stage: &str,
    args: &RunArgs,
    options: &ExtractOptions,
    schema: &FeatureSchema,
) -> anyhow::Result<TrainingTable> {
    let (entities, report) = read_entity_residues(dir, options)?;
    info!(
        stage,
        files = report.files,
        residues = report.residues_kept,
        unknown = report.unknown_residues,
        "extracted residues"
    );
    write_residue_table(&args.out_dir.join(format!("{stage}_residues.csv")), &entities)?;

    let (labels, angle_report) = compile_angles(dir, &args.tool)?;
    info!(
        stage,
        measured = angle_report.measured,
        failed = angle_report.failed,
        "measured angles"
    );
    write_angle_table(&args.out_dir.join(format!("{stage}_angles.csv")), &labels)?;

    let (features, _) = build_features(&entities, schema);
    let (table, join) = join_labels(&features, &labels);
    info!(
        stage,
        kept = join.kept,
        dropped_incomplete = join.dropped_incomplete,
        "joined labels"
    );
    Ok(table)
}
