//! Error types shared across the abpack crates.

use thiserror::Error;

/// Unified error type for the packing-angle pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackError {
    /// A residue code that is not one of the twenty standard amino acids
    /// (or the `X`/`XAA`/`UNK` placeholder). The offending record is
    /// normally skipped and counted rather than aborting the run.
    #[error("unknown residue code '{0}'")]
    UnknownResidueCode(String),

    /// No residue was observed at a position the feature schema requires.
    #[error("{entity}: no residue observed at position {position}")]
    MissingPosition { entity: String, position: String },

    /// The feature columns handed to a trained model do not match the
    /// columns it was trained on, in name or in order.
    #[error("feature schema mismatch: model expects [{expected}], got [{found}]")]
    SchemaMismatch { expected: String, found: String },

    /// A malformed line, token or file that cannot be interpreted.
    #[error("parse failure: {0}")]
    ParseFailure(String),
}

impl PackError {
    pub fn schema_mismatch(expected: &[String], found: &[String]) -> Self {
        PackError::SchemaMismatch {
            expected: expected.join(", "),
            found: found.join(", "),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        PackError::ParseFailure(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
