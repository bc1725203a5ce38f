//! Position list files: one position token per line, e.g. `L38`.

use abpack_core::PositionSet;
use anyhow::Context;
use std::path::Path;

pub fn read_position_file(path: &Path) -> anyhow::Result<PositionSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading position file {}", path.display()))?;
    let set = PositionSet::from_lines(&text)
        .with_context(|| format!("parsing position file {}", path.display()))?;
    Ok(set)
}
