//! CSV table formats.
//!
//! Four tables move between pipeline stages: the residue table
//! (`code,position,residue`), the angle table (`code,angle`), the training
//! table (`code`, the feature columns, `angle`) and the prediction table
//! (`code,angle,predicted,error`). Codes are always read as strings; left
//! to inference, codes like `12e8` would come back as numbers.

use abpack_core::{
    AminoAcid, AngleRecord, EntityResidues, FeatureSchema, PackError, Position, ResidueAtPosition,
    TrainingTable,
};
use anyhow::Context;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

fn read_df(path: &Path, overwrite: Schema) -> anyhow::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overwrite)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("opening table {}", path.display()))?
        .finish()
        .with_context(|| format!("reading table {}", path.display()))?;
    Ok(df)
}

fn write_df(path: &Path, df: &mut DataFrame) -> anyhow::Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating table {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("writing table {}", path.display()))?;
    Ok(())
}

/// Writes one `code,position,residue` row per extracted residue, one-letter
/// identities, entities in input order.
pub fn write_residue_table(path: &Path, entities: &[EntityResidues]) -> anyhow::Result<()> {
    let mut codes = Vec::new();
    let mut positions = Vec::new();
    let mut residues = Vec::new();
    for entity in entities {
        for r in &entity.residues {
            codes.push(entity.code.clone());
            positions.push(r.position.to_string());
            residues.push(r.residue.code1().to_string());
        }
    }
    let mut df = df!(
        "code" => codes,
        "position" => positions,
        "residue" => residues,
    )?;
    write_df(path, &mut df)
}

/// Reads a residue table back, grouping rows into entities by first
/// appearance of each code.
pub fn read_residue_table(path: &Path) -> anyhow::Result<Vec<EntityResidues>> {
    let overwrite = Schema::from_iter([
        Field::new("code".into(), DataType::String),
        Field::new("position".into(), DataType::String),
        Field::new("residue".into(), DataType::String),
    ]);
    let df = read_df(path, overwrite)?;

    let codes = df.column("code")?.str()?;
    let positions = df.column("position")?.str()?;
    let residues = df.column("residue")?.str()?;

    let mut entities: Vec<EntityResidues> = Vec::new();
    let mut by_code: HashMap<String, usize> = HashMap::new();
    for i in 0..df.height() {
        let (Some(code), Some(position), Some(residue)) =
            (codes.get(i), positions.get(i), residues.get(i))
        else {
            return Err(PackError::parse(format!(
                "empty cell in residue table {} row {i}",
                path.display()
            ))
            .into());
        };
        let position: Position = position.parse()?;
        let mut letters = residue.chars();
        let residue = match (letters.next(), letters.next()) {
            (Some(c), None) => AminoAcid::from_code1(c)?,
            _ => {
                return Err(PackError::UnknownResidueCode(residue.to_string()).into());
            }
        };
        let index = match by_code.get(code) {
            Some(&index) => index,
            None => {
                by_code.insert(code.to_string(), entities.len());
                entities.push(EntityResidues {
                    code: code.to_string(),
                    residues: Vec::new(),
                });
                entities.len() - 1
            }
        };
        entities[index]
            .residues
            .push(ResidueAtPosition { position, residue });
    }
    Ok(entities)
}

/// Writes a `code,angle` table.
pub fn write_angle_table(path: &Path, records: &[AngleRecord]) -> anyhow::Result<()> {
    let codes: Vec<String> = records.iter().map(|r| r.code.clone()).collect();
    let angles: Vec<f64> = records.iter().map(|r| r.angle).collect();
    let mut df = df!(
        "code" => codes,
        "angle" => angles,
    )?;
    write_df(path, &mut df)
}

/// Reads a `code,angle` table. An empty angle cell becomes `NaN`, which the
/// label join later drops and counts.
pub fn read_angle_table(path: &Path) -> anyhow::Result<Vec<AngleRecord>> {
    let overwrite = Schema::from_iter([
        Field::new("code".into(), DataType::String),
        Field::new("angle".into(), DataType::Float64),
    ]);
    let df = read_df(path, overwrite)?;

    let codes = df.column("code")?.str()?;
    let angles = df.column("angle")?.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(code) = codes.get(i) else {
            return Err(PackError::parse(format!(
                "empty code in angle table {} row {i}",
                path.display()
            ))
            .into());
        };
        records.push(AngleRecord {
            code: code.to_string(),
            angle: angles.get(i).unwrap_or(f64::NAN),
        });
    }
    Ok(records)
}

/// Writes a training table: `code`, the schema's feature columns, `angle`.
pub fn write_training_table(path: &Path, table: &TrainingTable) -> anyhow::Result<()> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.schema().width() + 2);
    columns.push(Column::new("code".into(), table.codes().to_vec()));
    for (j, name) in table.schema().columns().iter().enumerate() {
        let values: Vec<f64> = table.rows().iter().map(|row| row[j]).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    columns.push(Column::new("angle".into(), table.angles().to_vec()));
    let mut df = DataFrame::new(columns)?;
    write_df(path, &mut df)
}

/// Reads a training table, rebuilding the feature schema from the column
/// names. The table must be complete; holes were already dropped when it
/// was produced.
pub fn read_training_table(path: &Path) -> anyhow::Result<TrainingTable> {
    let overwrite = Schema::from_iter([Field::new("code".into(), DataType::String)]);
    let df = read_df(path, overwrite)?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    if names.first().map(String::as_str) != Some("code")
        || names.last().map(String::as_str) != Some("angle")
        || names.len() < 3
    {
        return Err(PackError::parse(format!(
            "training table {} must have columns 'code', features.., 'angle'",
            path.display()
        ))
        .into());
    }
    let schema = FeatureSchema::from_columns(&names[1..names.len() - 1])?;

    let codes_col = df.column("code")?.str()?;
    let mut codes = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(code) = codes_col.get(i) else {
            return Err(PackError::parse(format!(
                "empty code in training table {} row {i}",
                path.display()
            ))
            .into());
        };
        codes.push(code.to_string());
    }

    let numeric = |name: &str| -> anyhow::Result<Vec<f64>> {
        let column = df
            .column(name)?
            .cast(&DataType::Float64)
            .with_context(|| format!("column '{name}' in {} is not numeric", path.display()))?;
        let values = column.f64()?;
        let mut out = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            match values.get(i) {
                Some(v) if v.is_finite() => out.push(v),
                _ => {
                    return Err(PackError::parse(format!(
                        "column '{name}' in {} has a missing or non-finite value at row {i}",
                        path.display()
                    ))
                    .into())
                }
            }
        }
        Ok(out)
    };

    let mut rows = vec![Vec::with_capacity(schema.width()); df.height()];
    for name in schema.columns() {
        for (row, value) in rows.iter_mut().zip(numeric(name)?) {
            row.push(value);
        }
    }
    let angles = numeric("angle")?;

    Ok(TrainingTable::new(schema, codes, rows, angles)?)
}

/// One evaluated entity: the measured angle, the model's prediction and the
/// signed error between them.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub code: String,
    pub angle: f64,
    pub predicted: f64,
    pub error: f64,
}

/// Writes a `code,angle,predicted,error` table.
pub fn write_prediction_table(path: &Path, records: &[PredictionRecord]) -> anyhow::Result<()> {
    let mut df = df!(
        "code" => records.iter().map(|r| r.code.clone()).collect::<Vec<_>>(),
        "angle" => records.iter().map(|r| r.angle).collect::<Vec<_>>(),
        "predicted" => records.iter().map(|r| r.predicted).collect::<Vec<_>>(),
        "error" => records.iter().map(|r| r.error).collect::<Vec<_>>(),
    )?;
    write_df(path, &mut df)
}

pub fn read_prediction_table(path: &Path) -> anyhow::Result<Vec<PredictionRecord>> {
    let overwrite = Schema::from_iter([
        Field::new("code".into(), DataType::String),
        Field::new("angle".into(), DataType::Float64),
        Field::new("predicted".into(), DataType::Float64),
        Field::new("error".into(), DataType::Float64),
    ]);
    let df = read_df(path, overwrite)?;

    let codes = df.column("code")?.str()?;
    let angles = df.column("angle")?.f64()?;
    let predicted = df.column("predicted")?.f64()?;
    let errors = df.column("error")?.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(code), Some(angle), Some(predicted), Some(error)) =
            (codes.get(i), angles.get(i), predicted.get(i), errors.get(i))
        else {
            return Err(PackError::parse(format!(
                "empty cell in prediction table {} row {i}",
                path.display()
            ))
            .into());
        };
        records.push(PredictionRecord {
            code: code.to_string(),
            angle,
            predicted,
            error,
        });
    }
    Ok(records)
}
