use abpack_core::{build_features, join_labels, FeatureSchema};
use abpack_io::{read_angle_table, read_residue_table, write_training_table};
use std::path::Path;
use tracing::info;

pub fn execute(
    residues: &Path,
    angles: &Path,
    out: &Path,
    positions: Option<&Path>,
    loops: bool,
) -> anyhow::Result<()> {
    let set = super::position_set(positions)?;
    let schema = FeatureSchema::new(set, loops);

    let entities = read_residue_table(residues)?;
    let labels = read_angle_table(angles)?;

    let (features, build) = build_features(&entities, &schema);
    info!(
        entities = build.entities,
        complete = build.complete,
        incomplete = build.incomplete.len(),
        "encoded features"
    );

    let (table, join) = join_labels(&features, &labels);
    info!(
        labels = join.labels,
        kept = join.kept,
        dropped_incomplete = join.dropped_incomplete,
        unlabelled = join.unlabelled_features,
        "joined angle labels"
    );

    write_training_table(out, &table)?;
    info!(out = %out.display(), rows = table.len(), "wrote training table");
    Ok(())
}
