//! # abpack-io
//!
//! File formats and external tools for the packing-angle pipeline:
//! fixed-column structure files, sequence and position lists, the CSV
//! tables exchanged between stages, and the external angle measurement
//! tool.

pub mod angles;
pub mod csv;
pub mod pdb;
pub mod posfile;
pub mod seqfile;

pub use self::angles::{compile_angles, parse_angle_output, AngleReport, DEFAULT_ANGLE_TOOL};
pub use self::csv::{
    read_angle_table, read_prediction_table, read_residue_table, read_training_table,
    write_angle_table, write_prediction_table, write_residue_table, write_training_table,
    PredictionRecord,
};
pub use self::pdb::{
    parse_structure, read_entity_residues, read_structure_file, scan_structure_dir, DirReport,
    FileReport,
};
pub use self::posfile::read_position_file;
pub use self::seqfile::{parse_seq, read_seq_file};
