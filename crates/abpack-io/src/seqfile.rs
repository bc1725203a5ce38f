//! Sequence files: one `POSITION CODE` pair per line.
//!
//! ```text
//! L38 GLN
//! H100A GLY
//! ```
//!
//! The format feeds the same extraction path as structure files, so residue
//! codes are carried through verbatim and validated against the alphabet
//! there, not here.

use abpack_core::{PackError, ResidueRecord};
use anyhow::Context;
use std::path::Path;

/// Parses sequence text. Blank lines are skipped; anything else that is not
/// exactly two whitespace-separated tokens is a hard error.
pub fn parse_seq(text: &str) -> Result<Vec<ResidueRecord>, PackError> {
    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(position), Some(res_name), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(PackError::parse(format!(
                "sequence line {}: expected 'POSITION RESIDUE', got '{line}'",
                lineno + 1
            )));
        };
        records.push(ResidueRecord {
            position: position.parse()?,
            res_name: res_name.to_string(),
        });
    }
    Ok(records)
}

/// Reads a sequence file; the entity code is the file stem.
pub fn read_seq_file(path: &Path) -> anyhow::Result<(String, Vec<ResidueRecord>)> {
    let code = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sequence file {}", path.display()))?;
    let records = parse_seq(&text)
        .with_context(|| format!("parsing sequence file {}", path.display()))?;
    Ok((code, records))
}
