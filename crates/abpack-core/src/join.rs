//! Joining feature rows with packing-angle labels.
//!
//! The label side is authoritative: every label row is considered, feature
//! rows without a label are dropped, and the joined output is ordered by
//! code. Rows that would carry a `NaN` anywhere are excluded so the training
//! table is always complete.

use crate::error::{PackError, Result};
use crate::features::{rows_to_matrix, FeatureSchema, FeatureTable};
use itertools::Itertools;
use ndarray::{Array1, Array2};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// One labelled entity.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleRecord {
    pub code: String,
    pub angle: f64,
}

/// A complete, labelled feature table ready for fitting or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTable {
    schema: FeatureSchema,
    codes: Vec<String>,
    rows: Vec<Vec<f64>>,
    angles: Vec<f64>,
}

impl TrainingTable {
    pub fn new(
        schema: FeatureSchema,
        codes: Vec<String>,
        rows: Vec<Vec<f64>>,
        angles: Vec<f64>,
    ) -> Result<Self> {
        if codes.len() != rows.len() || codes.len() != angles.len() {
            return Err(PackError::parse(format!(
                "mismatched table lengths: {} codes, {} rows, {} angles",
                codes.len(),
                rows.len(),
                angles.len()
            )));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != schema.width()) {
            return Err(PackError::parse(format!(
                "row of width {} under a schema of width {}",
                bad.len(),
                schema.width()
            )));
        }
        Ok(Self {
            schema,
            codes,
            rows,
            angles,
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

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The predictor matrix, one row per entity.
    pub fn to_matrix(&self) -> Array2<f64> {
        rows_to_matrix(&self.rows, self.schema.width())
    }

    pub fn angle_array(&self) -> Array1<f64> {
        Array1::from_vec(self.angles.clone())
    }

    /// A new table holding the given rows, in the given order.
    pub fn subset(&self, indices: &[usize]) -> TrainingTable {
        TrainingTable {
            schema: self.schema.clone(),
            codes: indices
                .iter()
                .filter_map(|&i| self.codes.get(i).cloned())
                .collect(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
            angles: indices
                .iter()
                .filter_map(|&i| self.angles.get(i).copied())
                .collect(),
        }
    }
}

/// Counts for one join pass.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct JoinReport {
    pub labels: usize,
    pub kept: usize,
    /// Labels whose code has no feature row at all.
    pub labels_without_features: usize,
    /// Labelled rows dropped because a feature value (or the angle) was NaN.
    pub dropped_incomplete: usize,
    /// Feature rows that no label referenced.
    pub unlabelled_features: usize,
}

/// Joins features to labels, label side authoritative, output sorted by
/// code. Any row still containing a NaN after the join is dropped.
pub fn join_labels(features: &FeatureTable, labels: &[AngleRecord]) -> (TrainingTable, JoinReport) {
    let mut by_code: HashMap<&str, usize> = HashMap::with_capacity(features.len());
    for (i, code) in features.codes().iter().enumerate() {
        by_code.insert(code.as_str(), i);
    }

    let mut report = JoinReport {
        labels: labels.len(),
        ..Default::default()
    };
    let mut labelled: HashSet<&str> = HashSet::with_capacity(labels.len());
    let mut codes = Vec::new();
    let mut rows = Vec::new();
    let mut angles = Vec::new();

    for label in labels.iter().sorted_by(|a, b| a.code.cmp(&b.code)) {
        labelled.insert(label.code.as_str());
        let Some(&i) = by_code.get(label.code.as_str()) else {
            warn!(code = label.code.as_str(), "label has no feature row");
            report.labels_without_features += 1;
            continue;
        };
        let row = &features.rows()[i];
        if label.angle.is_nan() || row.iter().any(|v| v.is_nan()) {
            report.dropped_incomplete += 1;
            continue;
        }
        codes.push(label.code.clone());
        rows.push(row.clone());
        angles.push(label.angle);
    }

    report.unlabelled_features = features
        .codes()
        .iter()
        .filter(|c| !labelled.contains(c.as_str()))
        .count();
    report.kept = rows.len();

    (
        TrainingTable {
            schema: features.schema().clone(),
            codes,
            rows,
            angles,
        },
        report,
    )
}
