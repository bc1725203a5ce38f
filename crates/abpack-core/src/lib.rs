//! # abpack-core
//!
//! Data model for deriving VH/VL packing-angle predictors from numbered
//! antibody structures.
//!
//! __abpack-core__ provides the in-memory half of the pipeline:
//! * The residue alphabet and its 4-D physicochemical encoding
//! * Chain/position labels, position sets and the CDR loop ranges
//! * Extraction of first-seen residue identities from record streams
//! * Fixed-schema feature tables with loop-length columns
//! * The label join and the redundancy reduction that precede fitting
//!
//! File formats, the external angle tool and the regressor itself live in
//! the `abpack-io` and `abpack-model` crates.

pub mod encoding;
pub mod error;
pub mod extract;
pub mod features;
pub mod join;
pub mod nonred;
pub mod positions;

pub use self::encoding::{AminoAcid, FEATURE_LETTERS};
pub use self::error::{PackError, Result};
pub use self::extract::{
    extract, EntityResidues, ExtractOptions, ExtractReport, ResidueAtPosition, ResidueRecord,
};
pub use self::features::{
    build_complete_row, build_features, BuildReport, FeatureSchema, FeatureTable,
};
pub use self::join::{join_labels, AngleRecord, JoinReport, TrainingTable};
pub use self::nonred::{reduce, ReduceReport};
pub use self::positions::{CdrLoop, Chain, Position, PositionSet};
