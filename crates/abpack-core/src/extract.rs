//! Extraction of per-position residue identities from record streams.
//!
//! A structural record stream yields one [`ResidueRecord`] per atom line, so
//! the same position shows up many times in a row. Extraction keeps the first
//! sighting of each relevant position, drops the rest, and skips records
//! whose residue code is not in the encoding alphabet.

use crate::encoding::AminoAcid;
use crate::positions::{CdrLoop, Position, PositionSet};
use std::collections::HashSet;
use tracing::warn;

/// One residue observation from a record stream, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueRecord {
    pub position: Position,
    /// Three-letter residue code as written in the source.
    pub res_name: String,
}

/// A deduplicated residue identity at one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueAtPosition {
    pub position: Position,
    pub residue: AminoAcid,
}

/// Everything extracted for one entity, keyed by its code.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityResidues {
    pub code: String,
    pub residues: Vec<ResidueAtPosition>,
}

impl EntityResidues {
    pub fn residue_at(&self, position: &Position) -> Option<AminoAcid> {
        self.residues
            .iter()
            .find(|r| &r.position == position)
            .map(|r| r.residue)
    }
}

/// Which positions extraction keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub positions: PositionSet,
    /// Also keep residues inside the CDR loop ranges, so their observed
    /// lengths can be counted downstream.
    pub loops: bool,
}

impl ExtractOptions {
    pub fn new(positions: PositionSet) -> Self {
        Self {
            positions,
            loops: false,
        }
    }

    pub fn with_loops(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    pub fn is_relevant(&self, position: &Position) -> bool {
        self.positions.contains(position)
            || (self.loops && CdrLoop::ALL.iter().any(|l| l.contains(position)))
    }
}

/// Counts for one extraction pass.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExtractReport {
    pub records: usize,
    pub kept: usize,
    /// Further sightings of an already-recorded position.
    pub duplicates: usize,
    /// Records at positions outside the configured set and loops.
    pub irrelevant: usize,
    /// Records skipped because their residue code is not in the alphabet.
    pub unknown_residues: usize,
}

/// Reduces a record stream to first-seen residue identities at the relevant
/// positions. Unknown residue codes are skipped and counted; the position
/// they occupy stays unassigned.
pub fn extract(
    code: &str,
    records: &[ResidueRecord],
    options: &ExtractOptions,
) -> (EntityResidues, ExtractReport) {
    let mut seen: HashSet<Position> = HashSet::new();
    let mut residues = Vec::new();
    let mut report = ExtractReport::default();

    for record in records {
        report.records += 1;
        if !options.is_relevant(&record.position) {
            report.irrelevant += 1;
            continue;
        }
        if !seen.insert(record.position) {
            report.duplicates += 1;
            continue;
        }
        match AminoAcid::from_code3(&record.res_name) {
            Ok(residue) => residues.push(ResidueAtPosition {
                position: record.position,
                residue,
            }),
            Err(err) => {
                warn!(
                    entity = code,
                    position = %record.position,
                    "skipping record: {err}"
                );
                report.unknown_residues += 1;
            }
        }
    }
    report.kept = residues.len();

    (
        EntityResidues {
            code: code.to_string(),
            residues,
        },
        report,
    )
}
