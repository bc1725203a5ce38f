use abpack_io::{compile_angles, write_angle_table};
use std::path::Path;
use tracing::info;

pub fn execute(dir: &Path, out: &Path, tool: &str) -> anyhow::Result<()> {
    let (records, report) = compile_angles(dir, tool)?;
    info!(
        files = report.files,
        measured = report.measured,
        failed = report.failed,
        "measured packing angles"
    );

    write_angle_table(out, &records)?;
    info!(out = %out.display(), "wrote angle table");
    Ok(())
}
