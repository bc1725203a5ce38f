//! Fixed-schema feature tables.
//!
//! The schema is defined entirely by the position set and the loops flag:
//! four encoded columns per position, in set order, then one observed-length
//! column per CDR loop. Entities missing a residue at a schema position get
//! `NaN` in that block; nothing is imputed here so incomplete rows stay
//! visible until the label join drops them.

use crate::encoding::FEATURE_LETTERS;
use crate::error::{PackError, Result};
use crate::extract::EntityResidues;
use crate::positions::{CdrLoop, Position, PositionSet};
use itertools::Itertools;
use ndarray::Array2;
use std::str::FromStr;
use tracing::warn;

/// Column layout shared by feature tables, training tables and model
/// artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    set: PositionSet,
    with_loops: bool,
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(set: PositionSet, with_loops: bool) -> Self {
        let mut columns = set.position_columns();
        if with_loops {
            columns.extend(CdrLoop::ALL.iter().map(|l| l.column()));
        }
        Self {
            set,
            with_loops,
            columns,
        }
    }

    /// Reconstructs a schema from stored column names, validating that they
    /// form 4-wide position blocks with an optional loop-length tail.
    pub fn from_columns(columns: &[String]) -> Result<Self> {
        let loop_tail: Vec<String> = CdrLoop::ALL.iter().map(|l| l.column()).collect();
        let with_loops =
            columns.len() >= loop_tail.len() && columns[columns.len() - loop_tail.len()..] == loop_tail[..];
        let body = if with_loops {
            &columns[..columns.len() - loop_tail.len()]
        } else {
            columns
        };
        if body.is_empty() || body.len() % FEATURE_LETTERS.len() != 0 {
            return Err(PackError::parse(format!(
                "{} feature columns do not form {}-wide position blocks",
                body.len(),
                FEATURE_LETTERS.len()
            )));
        }
        let mut positions = Vec::with_capacity(body.len() / FEATURE_LETTERS.len());
        for block in body.chunks(FEATURE_LETTERS.len()) {
            let mut token: Option<&str> = None;
            for (column, &letter) in block.iter().zip(FEATURE_LETTERS.iter()) {
                let stem = column.strip_suffix(letter).ok_or_else(|| {
                    PackError::parse(format!("unexpected feature column '{column}'"))
                })?;
                match token {
                    None => token = Some(stem),
                    Some(t) if t == stem => {}
                    Some(t) => {
                        return Err(PackError::parse(format!(
                            "feature column '{column}' breaks the '{t}' block"
                        )))
                    }
                }
            }
            let token = token.ok_or_else(|| PackError::parse("empty position block"))?;
            positions.push(Position::from_str(token)?);
        }
        let set = PositionSet::new(positions)?;
        Ok(Self::new(set, with_loops))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn positions(&self) -> &PositionSet {
        &self.set
    }

    pub fn with_loops(&self) -> bool {
        self.with_loops
    }

    /// Number of leading columns that encode residues (the redundancy key).
    pub fn n_position_columns(&self) -> usize {
        self.set.len() * FEATURE_LETTERS.len()
    }

    /// The position a column index belongs to, for the encoded block only.
    pub fn position_for_column(&self, index: usize) -> Option<&Position> {
        if index < self.n_position_columns() {
            self.set.get(index / FEATURE_LETTERS.len())
        } else {
            None
        }
    }
}

/// One row of encoded values per entity, under a fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    schema: FeatureSchema,
    codes: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub fn new(schema: FeatureSchema, codes: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if codes.len() != rows.len() {
            return Err(PackError::parse(format!(
                "{} codes against {} feature rows",
                codes.len(),
                rows.len()
            )));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != schema.width()) {
            return Err(PackError::parse(format!(
                "feature row of width {} under a schema of width {}",
                bad.len(),
                schema.width()
            )));
        }
        Ok(Self {
            schema,
            codes,
            rows,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_matrix(&self) -> Array2<f64> {
        rows_to_matrix(&self.rows, self.schema.width())
    }
}

pub(crate) fn rows_to_matrix(rows: &[Vec<f64>], width: usize) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), width));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.iter().enumerate().take(width) {
            matrix[[i, j]] = *value;
        }
    }
    matrix
}

/// Per-build counts, with the incomplete entities spelled out.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    pub entities: usize,
    pub complete: usize,
    /// Entities with at least one schema position unassigned, with the
    /// missing positions in set order.
    pub incomplete: Vec<(String, Vec<Position>)>,
}

/// Builds the feature table for a batch of entities.
pub fn build_features(
    entities: &[EntityResidues],
    schema: &FeatureSchema,
) -> (FeatureTable, BuildReport) {
    let mut codes = Vec::with_capacity(entities.len());
    let mut rows = Vec::with_capacity(entities.len());
    let mut report = BuildReport {
        entities: entities.len(),
        ..Default::default()
    };

    for entity in entities {
        let mut row = vec![f64::NAN; schema.width()];
        let mut missing = Vec::new();
        for (i, position) in schema.positions().iter().enumerate() {
            match entity.residue_at(position) {
                Some(residue) => {
                    let start = i * FEATURE_LETTERS.len();
                    row[start..start + FEATURE_LETTERS.len()].copy_from_slice(&residue.encode());
                }
                None => missing.push(*position),
            }
        }
        if schema.with_loops() {
            let base = schema.n_position_columns();
            for (j, l) in CdrLoop::ALL.iter().enumerate() {
                let observed = entity
                    .residues
                    .iter()
                    .filter(|r| l.contains(&r.position))
                    .count();
                row[base + j] = observed as f64;
            }
        }
        if missing.is_empty() {
            report.complete += 1;
        } else {
            warn!(
                entity = entity.code.as_str(),
                "no residue at {}",
                missing.iter().join(", ")
            );
            report.incomplete.push((entity.code.clone(), missing));
        }
        codes.push(entity.code.clone());
        rows.push(row);
    }

    (
        FeatureTable {
            schema: schema.clone(),
            codes,
            rows,
        },
        report,
    )
}

/// Builds the single feature row for one entity, failing instead of leaving
/// `NaN` behind. This is the prediction-time entry point.
pub fn build_complete_row(entity: &EntityResidues, schema: &FeatureSchema) -> Result<Vec<f64>> {
    let (table, report) = build_features(std::slice::from_ref(entity), schema);
    if let Some((code, missing)) = report.incomplete.first() {
        return Err(PackError::MissingPosition {
            entity: code.clone(),
            position: missing.iter().join(", "),
        });
    }
    Ok(table.rows.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::AminoAcid;
    use crate::extract::ResidueAtPosition;

    fn entity(code: &str, residues: &[(&str, &str)]) -> EntityResidues {
        EntityResidues {
            code: code.to_string(),
            residues: residues
                .iter()
                .map(|(pos, res)| ResidueAtPosition {
                    position: pos.parse().unwrap(),
                    residue: AminoAcid::from_code3(res).unwrap(),
                })
                .collect(),
        }
    }

    fn two_position_schema() -> FeatureSchema {
        FeatureSchema::new(PositionSet::from_lines("L38\nH33").unwrap(), false)
    }

    #[test]
    fn encodes_rows_in_schema_order() {
        let schema = two_position_schema();
        let entities = vec![entity("1mlb", &[("H33", "TYR"), ("L38", "GLN")])];
        let (table, report) = build_features(&entities, &schema);

        assert_eq!(table.len(), 1);
        assert_eq!(table.codes(), ["1mlb"]);
        // L38 = Q, H33 = Y, in set order regardless of observation order
        assert_eq!(
            table.rows()[0],
            vec![5.0, 4.0, -0.69, 0.0, 8.0, 6.0, 0.02, 0.0]
        );
        assert_eq!(report.complete, 1);
        assert!(report.incomplete.is_empty());
    }

    #[test]
    fn missing_positions_become_nan_blocks() {
        let schema = two_position_schema();
        let entities = vec![entity("1mfa", &[("L38", "GLN")])];
        let (table, report) = build_features(&entities, &schema);

        let row = &table.rows()[0];
        assert_eq!(&row[0..4], &[5.0, 4.0, -0.69, 0.0]);
        assert!(row[4..8].iter().all(|v| v.is_nan()));
        assert_eq!(report.complete, 0);
        assert_eq!(
            report.incomplete,
            vec![("1mfa".to_string(), vec!["H33".parse().unwrap()])]
        );
    }

    #[test]
    fn loop_lengths_count_observed_positions_including_insertions() {
        let schema = FeatureSchema::new(PositionSet::from_lines("L38").unwrap(), true);
        let entities = vec![entity(
            "1mlb",
            &[
                ("L38", "GLN"),
                ("L24", "ARG"),
                ("L25", "ALA"),
                ("L30", "SER"),
                ("L30A", "ASN"),
                ("H52", "SER"),
                ("H52A", "GLY"),
                ("H100", "VAL"),
                ("H100A", "GLY"),
                ("H100B", "TYR"),
            ],
        )];
        let (table, _) = build_features(&entities, &schema);

        assert_eq!(
            schema.columns(),
            &["L38a", "L38b", "L38c", "L38d", "L1_length", "H2_length", "H3_length"]
        );
        let row = &table.rows()[0];
        assert_eq!(row[4], 4.0); // L24 L25 L30 L30A
        assert_eq!(row[5], 2.0); // H52 H52A
        assert_eq!(row[6], 3.0); // H100 H100A H100B
    }

    #[test]
    fn unrelated_residues_do_not_disturb_the_row() {
        let schema = two_position_schema();
        let entities = vec![entity(
            "1mlb",
            &[("L38", "GLN"), ("H33", "TYR"), ("H91", "TRP"), ("L87", "PHE")],
        )];
        let (table, _) = build_features(&entities, &schema);
        assert_eq!(
            table.rows()[0],
            vec![5.0, 4.0, -0.69, 0.0, 8.0, 6.0, 0.02, 0.0]
        );
    }

    #[test]
    fn complete_row_reports_missing_positions() {
        let schema = two_position_schema();
        let err = build_complete_row(&entity("7seq", &[("L38", "GLN")]), &schema).unwrap_err();
        assert_eq!(
            err,
            PackError::MissingPosition {
                entity: "7seq".to_string(),
                position: "H33".to_string(),
            }
        );

        let row =
            build_complete_row(&entity("7seq", &[("L38", "GLN"), ("H33", "TYR")]), &schema)
                .unwrap();
        assert_eq!(row, vec![5.0, 4.0, -0.69, 0.0, 8.0, 6.0, 0.02, 0.0]);
    }

    #[test]
    fn schema_round_trips_through_column_names() {
        let schema = FeatureSchema::new(PositionSet::classic(), true);
        let rebuilt = FeatureSchema::from_columns(schema.columns()).unwrap();
        assert_eq!(rebuilt, schema);

        let bare = FeatureSchema::new(PositionSet::classic(), false);
        let rebuilt = FeatureSchema::from_columns(bare.columns()).unwrap();
        assert_eq!(rebuilt, bare);
    }

    #[test]
    fn malformed_column_lists_are_rejected() {
        let cases: Vec<Vec<String>> = vec![
            vec![],
            vec!["L38a".into(), "L38b".into()],
            vec!["L38a".into(), "L40b".into(), "L38c".into(), "L38d".into()],
            vec!["L38a".into(), "L38b".into(), "L38c".into(), "L38e".into()],
            vec!["foo".into(), "bar".into(), "baz".into(), "qux".into()],
        ];
        for columns in cases {
            assert!(
                FeatureSchema::from_columns(&columns).is_err(),
                "{columns:?} accepted"
            );
        }
    }

    #[test]
    fn matrix_matches_rows() {
        let schema = two_position_schema();
        let entities = vec![
            entity("a", &[("L38", "GLY"), ("H33", "ALA")]),
            entity("b", &[("L38", "LYS"), ("H33", "ASP")]),
        ];
        let (table, _) = build_features(&entities, &schema);
        let matrix = table.to_matrix();
        assert_eq!(matrix.shape(), &[2, 8]);
        assert_eq!(matrix[[0, 0]], 0.0); // Gly side-chain atoms
        assert_eq!(matrix[[1, 0]], 15.0); // Lys side-chain atoms
        assert_eq!(matrix[[1, 7]], -1.0); // Asp charge
    }
}
