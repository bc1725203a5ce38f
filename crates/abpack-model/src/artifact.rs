//! Trained-model artifacts on disk.
//!
//! The weights go into a safetensors file; a JSON sidecar next to it
//! (same stem, `.json`) records the feature columns the model was fitted
//! on and the training settings. Prediction refuses any table whose
//! columns differ from the sidecar's, in name or order.

use crate::mlp::{MlpConfig, MlpRegressor};
use crate::regressor::AngleRegressor;
use abpack_core::{PackError, TrainingTable};
use anyhow::{bail, Context};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub columns: Vec<String>,
    pub in_dim: usize,
    pub config: MlpConfig,
}

/// A fitted regressor bound to the feature columns it was fitted on.
pub struct TrainedModel {
    regressor: MlpRegressor,
    columns: Vec<String>,
}

/// Fits a fresh network to a complete training table.
pub fn train_model(table: &TrainingTable, config: MlpConfig) -> anyhow::Result<TrainedModel> {
    if table.is_empty() {
        bail!("cannot train on an empty table");
    }
    info!(
        rows = table.len(),
        columns = table.schema().width(),
        "training"
    );
    let mut regressor = MlpRegressor::new(table.schema().width(), config)?;
    let x = table.to_matrix();
    let y = table.angle_array();
    regressor.fit(x.view(), y.view())?;
    Ok(TrainedModel {
        regressor,
        columns: table.schema().columns().to_vec(),
    })
}

impl TrainedModel {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn config(&self) -> &MlpConfig {
        self.regressor.config()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.regressor
            .varmap()
            .save(path)
            .with_context(|| format!("saving weights to {}", path.display()))?;
        let meta = ModelMeta {
            columns: self.columns.clone(),
            in_dim: self.regressor.in_dim(),
            config: self.regressor.config().clone(),
        };
        let sidecar = path.with_extension("json");
        fs::write(&sidecar, serde_json::to_string_pretty(&meta)?)
            .with_context(|| format!("writing sidecar {}", sidecar.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let sidecar = path.with_extension("json");
        let text = fs::read_to_string(&sidecar)
            .with_context(|| format!("reading sidecar {}", sidecar.display()))?;
        let meta: ModelMeta = serde_json::from_str(&text)
            .with_context(|| format!("parsing sidecar {}", sidecar.display()))?;
        if meta.in_dim != meta.columns.len() {
            bail!(
                "sidecar {} is inconsistent: {} columns against input width {}",
                sidecar.display(),
                meta.columns.len(),
                meta.in_dim
            );
        }
        let mut regressor = MlpRegressor::new(meta.in_dim, meta.config)?;
        regressor
            .varmap_mut()
            .load(path)
            .with_context(|| format!("loading weights from {}", path.display()))?;
        Ok(Self {
            regressor,
            columns: meta.columns,
        })
    }

    /// Predicts angles for rows laid out under `columns`. The columns must
    /// match the fitted ones exactly.
    pub fn predict(&self, columns: &[String], x: ArrayView2<f64>) -> anyhow::Result<Array1<f64>> {
        if columns != self.columns.as_slice() {
            return Err(PackError::schema_mismatch(&self.columns, columns).into());
        }
        self.regressor.predict(x)
    }
}
