use abpack_core::ExtractOptions;
use abpack_io::{read_entity_residues, write_residue_table};
use std::path::Path;
use tracing::info;

pub fn execute(dir: &Path, out: &Path, positions: Option<&Path>, loops: bool) -> anyhow::Result<()> {
    let set = super::position_set(positions)?;
    let options = ExtractOptions::new(set).with_loops(loops);

    let (entities, report) = read_entity_residues(dir, &options)?;
    info!(
        files = report.files,
        residues = report.residues_kept,
        unknown = report.unknown_residues,
        malformed = report.malformed,
        "extracted residues"
    );

    write_residue_table(out, &entities)?;
    info!(out = %out.display(), "wrote residue table");
    Ok(())
}
