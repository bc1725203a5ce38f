//! Redundancy reduction over the encoded interface positions.
//!
//! Two rows are redundant when their encoded position columns are bitwise
//! identical; the encoding is injective over the residue alphabet, so this is
//! the same as having identical residues at every interface position. Loop
//! lengths and angles take no part in the key. The first row wins.

use crate::join::TrainingTable;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ReduceReport {
    pub input_rows: usize,
    pub kept: usize,
    pub removed: usize,
}

/// Drops rows whose interface residues duplicate an earlier row.
pub fn reduce(table: &TrainingTable) -> (TrainingTable, ReduceReport) {
    let key_width = table.schema().n_position_columns();
    let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(table.len());
    let mut keep = Vec::with_capacity(table.len());

    for (i, row) in table.rows().iter().enumerate() {
        let key: Vec<u64> = row
            .iter()
            .take(key_width)
            .map(|v| v.to_bits())
            .collect();
        if seen.insert(key) {
            keep.push(i);
        } else {
            debug!(code = table.codes()[i].as_str(), "redundant interface sequence");
        }
    }

    let report = ReduceReport {
        input_rows: table.len(),
        kept: keep.len(),
        removed: table.len() - keep.len(),
    };
    (table.subset(&keep), report)
}
