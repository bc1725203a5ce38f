pub mod angles;
pub mod encode;
pub mod extract;
pub mod nonred;
pub mod plot;
pub mod predict;
pub mod predict_seq;
pub mod run;
pub mod train;

use abpack_core::PositionSet;
use abpack_io::read_position_file;
use std::path::Path;

/// The configured position set, or the classic interface set.
fn position_set(positions: Option<&Path>) -> anyhow::Result<PositionSet> {
    match positions {
        Some(path) => read_position_file(path),
        None => Ok(PositionSet::classic()),
    }
}
