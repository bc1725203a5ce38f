//! Fixed-offset reading of numbered antibody structure files.
//!
//! The inputs are renumbered Fv files whose `ATOM` lines carry the position
//! in fixed columns: residue name in bytes 17..21, chain in 21..22 and the
//! residue number with its insertion letter in 23..27. Only chains `L` and
//! `H` contribute; everything else in the file is passed over.

use abpack_core::{extract, Chain, EntityResidues, ExtractOptions, Position, ResidueRecord};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Per-file line counts.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FileReport {
    pub atom_lines: usize,
    pub kept: usize,
    /// `ATOM` lines on chains other than L/H.
    pub other_chains: usize,
    /// Lines too short or with an unparseable residue number.
    pub malformed: usize,
}

/// Reads the residue records of one structure file, in file order.
pub fn read_structure_file(path: &Path) -> anyhow::Result<(Vec<ResidueRecord>, FileReport)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading structure file {}", path.display()))?;
    Ok(parse_structure(&text))
}

/// Parses residue records from in-memory structure text. Malformed lines
/// are skipped and counted rather than failing the file.
pub fn parse_structure(text: &str) -> (Vec<ResidueRecord>, FileReport) {
    let mut records = Vec::new();
    let mut report = FileReport::default();

    for line in text.lines() {
        if !line.starts_with("ATOM") {
            continue;
        }
        report.atom_lines += 1;

        let (Some(res_name), Some(chain_str), Some(resnum)) = (
            line.get(17..21).map(str::trim),
            line.get(21..22),
            line.get(23..27).map(str::trim),
        ) else {
            warn!("short record line: '{line}'");
            report.malformed += 1;
            continue;
        };

        let Ok(chain) = Chain::from_str(chain_str) else {
            report.other_chains += 1;
            continue;
        };

        match Position::from_chain_and_resnum(chain, resnum) {
            Ok(position) => {
                records.push(ResidueRecord {
                    position,
                    res_name: res_name.to_string(),
                });
                report.kept += 1;
            }
            Err(err) => {
                warn!("skipping record line: {err}");
                report.malformed += 1;
            }
        }
    }

    (records, report)
}

/// Structure files under a directory: `*.pdb` and `*.ent`, sorted by file
/// name. The entity code is the file stem, taken verbatim.
pub fn scan_structure_dir(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading structure directory {}", dir.display()))?;

    let mut found: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let known_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdb") || e.eq_ignore_ascii_case("ent"))
            .unwrap_or(false);
        if !known_ext {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        found.push((code.to_string(), path.clone()));
    }

    found.sort();
    found.dedup_by(|next, kept| {
        if next.0 == kept.0 {
            warn!(code = next.0.as_str(), "duplicate entity code in directory, keeping first file");
            true
        } else {
            false
        }
    });
    Ok(found)
}

/// Aggregate counts for a directory read.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DirReport {
    pub files: usize,
    pub atom_lines: usize,
    pub other_chains: usize,
    pub malformed: usize,
    pub residues_kept: usize,
    pub unknown_residues: usize,
}

/// Reads and extracts every structure in a directory. Entities that yield
/// no residues still appear in the output so downstream reports can name
/// them.
pub fn read_entity_residues(
    dir: &Path,
    options: &ExtractOptions,
) -> anyhow::Result<(Vec<EntityResidues>, DirReport)> {
    let mut entities = Vec::new();
    let mut report = DirReport::default();

    for (code, path) in scan_structure_dir(dir)? {
        let (records, file_report) = read_structure_file(&path)?;
        report.files += 1;
        report.atom_lines += file_report.atom_lines;
        report.other_chains += file_report.other_chains;
        report.malformed += file_report.malformed;

        let (entity, extract_report) = extract(&code, &records, options);
        report.residues_kept += extract_report.kept;
        report.unknown_residues += extract_report.unknown_residues;
        debug!(
            code = code.as_str(),
            residues = extract_report.kept,
            "extracted structure"
        );
        entities.push(entity);
    }

    Ok((entities, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use abpack_core::{AminoAcid, PositionSet};
    use abpack_test_data::TestFile;

    #[test]
    fn parses_fixed_offset_atom_lines() {
        let text = "\
ATOM      1 N    GLN L  38       0.000   2.000  -3.000  1.00 20.00           N
ATOM      2 CA   TYR H 100A      1.000   2.500  -2.750  1.00 20.00           C
HETATM    3 O    HOH L 200       9.000   9.000   9.000  1.00 20.00           O
ATOM      4 N    ALA A  10       0.000   0.000   0.000  1.00 20.00           N
ATOM      5 N
REMARK 950 CHAIN L LIGHT
";
        let (records, report) = parse_structure(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, "L38".parse().unwrap());
        assert_eq!(records[0].res_name, "GLN");
        assert_eq!(records[1].position, "H100A".parse().unwrap());
        assert_eq!(records[1].res_name, "TYR");
        assert_eq!(report.atom_lines, 4);
        assert_eq!(report.kept, 2);
        assert_eq!(report.other_chains, 1);
        assert_eq!(report.malformed, 1);
    }

    #[test]
    fn reads_a_complete_structure_fixture() {
        let (path, _temp) = TestFile::antibody_01().create_temp().unwrap();
        let (records, report) = read_structure_file(Path::new(&path)).unwrap();

        // 50 residues on L and H, four atoms each
        assert_eq!(report.atom_lines, 200);
        assert_eq!(report.kept, 200);
        assert_eq!(report.malformed, 0);
        assert!(records
            .iter()
            .any(|r| r.position == "H100B".parse().unwrap() && r.res_name == "TYR"));
    }

    #[test]
    fn scans_directories_sorted_with_unique_codes() {
        let dir = tempfile::tempdir().unwrap();
        TestFile::antibody_01().write_to(dir.path().join("1mlb.pdb")).unwrap();
        TestFile::antibody_02().write_to(dir.path().join("2fb4.ent")).unwrap();
        TestFile::antibody_02().write_to(dir.path().join("2fb4.pdb")).unwrap();
        TestFile::antibody_03().write_to(dir.path().join("notes.txt")).unwrap();

        let found = scan_structure_dir(dir.path()).unwrap();
        let codes: Vec<&str> = found.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, ["1mlb", "2fb4"]);
    }

    #[test]
    fn extracts_entities_across_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        TestFile::antibody_01().write_to(dir.path().join("1mlb.pdb")).unwrap();
        TestFile::antibody_03().write_to(dir.path().join("1mfa.pdb")).unwrap();

        let options = ExtractOptions::new(PositionSet::classic()).with_loops(true);
        let (entities, report) = read_entity_residues(dir.path(), &options).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].code, "1mfa");
        assert_eq!(entities[1].code, "1mlb");
        assert_eq!(report.files, 2);
        // ab03 carries the one PCA residue
        assert_eq!(report.unknown_residues, 1);

        let mlb = &entities[1];
        assert_eq!(
            mlb.residue_at(&"L38".parse().unwrap()),
            Some(AminoAcid::Gln)
        );
        // 13 interface + 12 + 10 + 10 loop residues
        assert_eq!(mlb.residues.len(), 45);

        let mfa = &entities[0];
        assert!(mfa.residue_at(&"H91".parse().unwrap()).is_none());
        assert!(mfa.residue_at(&"L46".parse().unwrap()).is_none());
        assert_eq!(mfa.residue_at(&"L27".parse().unwrap()), Some(AminoAcid::Unk));
    }
}
