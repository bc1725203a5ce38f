use abpack_core::reduce;
use abpack_io::{read_training_table, write_training_table};
use std::path::Path;
use tracing::info;

pub fn execute(input: &Path, out: &Path) -> anyhow::Result<()> {
    let table = read_training_table(input)?;
    let (reduced, report) = reduce(&table);
    info!(
        input_rows = report.input_rows,
        kept = report.kept,
        removed = report.removed,
        "reduced redundancy"
    );

    write_training_table(out, &reduced)?;
    info!(out = %out.display(), "wrote reduced table");
    Ok(())
}
