//! abpack-test-data
//!
//! A module to provide test files embedded in the crate for use in testing.
//! The fixtures are small synthetic Fv structures with antibody numbering
//! applied, plus the position list, sequence and angle tables that go with
//! them.
//!
//! The test files are represented as `TestFile` objects which package the
//! raw data and create temporary files for programs to operate on.
use std::fs;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use abpack_test_data::TestFile;
/// let (pdb_file, _temp) = TestFile::antibody_01().create_temp().unwrap();
/// let (dat_file, _temp) = TestFile::positions_01().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Complete Fv with every classic interface position present.
    /// Loop observations: L1 = 12 (one insertion), H2 = 10, H3 = 10.
    pub fn antibody_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/ab01.pdb"),
            suffix: "pdb",
        }
    }
    /// Same interface residues as `antibody_01` but L1 = 11; redundant with
    /// it under the interface key.
    pub fn antibody_02() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/ab02.pdb"),
            suffix: "pdb",
        }
    }
    /// Defective Fv: H91 absent, L46 is PCA (outside the alphabet) and L27
    /// is UNK.
    pub fn antibody_03() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/ab03.pdb"),
            suffix: "pdb",
        }
    }
    /// Complete Fv with an interface distinct from `antibody_01`.
    /// Loop observations: L1 = 11, H2 = 9, H3 = 8.
    pub fn antibody_04() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/ab04.pdb"),
            suffix: "pdb",
        }
    }
    /// The classic 13-position interface list, one token per line.
    pub fn positions_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/positions/classic13.dat"),
            suffix: "dat",
        }
    }
    /// Sequence listing of `antibody_01` (`POSITION CODE3` per line).
    pub fn seq_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/sequences/ab01.seq"),
            suffix: "seq",
        }
    }
    /// Sequence listing of `antibody_03`, defects included.
    pub fn seq_03() -> Self {
        Self {
            filebinary: include_bytes!("../data/sequences/ab03.seq"),
            suffix: "seq",
        }
    }
    /// Angle labels keyed by the codes the CLI tests use: 1mfa (= 03),
    /// 1mlb (= 01), 2fb4 (= 02), 3hfm (= 04) and one code without any
    /// structure.
    pub fn angles_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/angles/angles.csv"),
            suffix: "csv",
        }
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    /// Writes the fixture to a chosen path, for tests that need to control
    /// the filename (the directory scanners derive entity codes from stems).
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.filebinary)
    }
}
