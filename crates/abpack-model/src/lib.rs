//! # abpack-model
//!
//! Fitting and applying the packing-angle regressor: a small feed-forward
//! network over encoded feature rows, persisted as safetensors weights with
//! a JSON sidecar describing the feature columns.

pub mod artifact;
pub mod metrics;
pub mod mlp;
pub mod regressor;

pub use self::artifact::{train_model, ModelMeta, TrainedModel};
pub use self::metrics::{mae, mean_error, rmse};
pub use self::mlp::{MlpConfig, MlpRegressor};
pub use self::regressor::AngleRegressor;
